//! ANU quantum numbers service.
//!
//! `GET ?length=<n>&type=uint8` with the API key in `x-api-key`, answered by
//! `{"data": [<int>, ...]}`. Elements are coerced to integers and masked to a
//! byte, so `256` becomes `0` and `-1` becomes `255`.

use serde_json::Value;

use super::JsonClient;
use crate::error::{QrngError, Result};
use crate::settings::Settings;
use crate::source::{EntropySource, SourceInfo, SourceTag};

pub const API_KEY_HEADER: &str = "x-api-key";

static ANU_INFO: SourceInfo = SourceInfo {
    name: "anu",
    description: "ANU quantum numbers service, uint8 array payload (API key required)",
    tag: SourceTag::Anu,
    remote: true,
};

pub struct AnuSource {
    url: String,
    api_key: Option<String>,
    http: JsonClient,
}

impl AnuSource {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            url: settings.anu_url.clone(),
            api_key: settings.anu_key.clone(),
            http: JsonClient::new(SourceTag::Anu, settings.timeout)?,
        })
    }
}

impl EntropySource for AnuSource {
    fn info(&self) -> &SourceInfo {
        &ANU_INFO
    }

    fn fetch(&self, length: usize) -> Result<Vec<u8>> {
        if length == 0 {
            return Err(QrngError::length(length));
        }
        let Some(key) = self.api_key.as_deref() else {
            return Err(QrngError::Config {
                backend: SourceTag::Anu,
                message: "ANU API key not configured".to_string(),
            });
        };
        let query = [
            ("length", length.to_string()),
            ("type", "uint8".to_string()),
        ];
        let body = self.http.get(&self.url, &query, &[(API_KEY_HEADER, key)])?;
        decode_payload(&body, length)
    }
}

/// Extract, length-check and byte-coerce the `data` array.
pub(crate) fn decode_payload(body: &Value, length: usize) -> Result<Vec<u8>> {
    let values = body
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| QrngError::format(SourceTag::Anu, format!("unexpected response: {body}")))?;

    if values.len() != length {
        return Err(QrngError::Shape {
            backend: Some(SourceTag::Anu),
            expected: length,
            actual: values.len(),
        });
    }

    values
        .iter()
        .map(|v| {
            coerce_byte(v).ok_or_else(|| {
                QrngError::format(SourceTag::Anu, format!("data decode failed at {v}"))
            })
        })
        .collect()
}

fn coerce_byte(value: &Value) -> Option<u8> {
    let n: i64 = match value {
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i,
            // Above i64::MAX: only the low byte matters.
            (None, Some(u), _) => return Some((u & 0xFF) as u8),
            (None, None, Some(f)) if f.is_finite() => f.trunc() as i64,
            _ => return None,
        },
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => s.trim().parse().ok()?,
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    Some((n & 0xFF) as u8)
}
