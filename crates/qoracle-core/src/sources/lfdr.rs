//! LFDR QRNG service: `GET ?length=<n>&format=HEX` → `{"qrn": "<hex>"}`.

use serde_json::Value;

use super::JsonClient;
use crate::error::{QrngError, Result};
use crate::settings::Settings;
use crate::source::{EntropySource, SourceInfo, SourceTag};

static LFDR_INFO: SourceInfo = SourceInfo {
    name: "lfdr",
    description: "LFDR quantum random number service, hex-encoded payload",
    tag: SourceTag::Lfdr,
    remote: true,
};

pub struct LfdrSource {
    url: String,
    http: JsonClient,
}

impl LfdrSource {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            url: settings.lfdr_url.clone(),
            http: JsonClient::new(SourceTag::Lfdr, settings.timeout)?,
        })
    }
}

impl EntropySource for LfdrSource {
    fn info(&self) -> &SourceInfo {
        &LFDR_INFO
    }

    fn fetch(&self, length: usize) -> Result<Vec<u8>> {
        if length == 0 {
            return Err(QrngError::length(length));
        }
        let query = [
            ("length", length.to_string()),
            ("format", "HEX".to_string()),
        ];
        let body = self.http.get(&self.url, &query, &[])?;
        decode_payload(&body, length)
    }
}

/// Extract and validate the `qrn` hex field.
pub(crate) fn decode_payload(body: &Value, length: usize) -> Result<Vec<u8>> {
    let qrn = body.get("qrn").and_then(Value::as_str).ok_or_else(|| {
        QrngError::format(SourceTag::Lfdr, format!("unexpected response: {body}"))
    })?;

    // Whitespace between byte pairs is tolerated.
    let digits: String = qrn.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let raw = hex::decode(&digits)
        .map_err(|e| QrngError::format(SourceTag::Lfdr, format!("hex decode failed: {e}")))?;

    if raw.len() != length {
        return Err(QrngError::Shape {
            backend: Some(SourceTag::Lfdr),
            expected: length,
            actual: raw.len(),
        });
    }
    Ok(raw)
}
