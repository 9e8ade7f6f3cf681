//! Concrete entropy sources: two remote QRNG services and the local fallback.

pub mod anu;
pub mod lfdr;
pub mod local;

pub use anu::AnuSource;
pub use lfdr::LfdrSource;
pub use local::LocalSource;

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::{QrngError, Result};
use crate::settings::Settings;
use crate::source::{EntropySource, SourceTag};

/// How much of an unparseable body to quote in the error message.
const BODY_EXCERPT_CHARS: usize = 200;

/// Blocking JSON-over-HTTP GET shared by the remote sources.
pub(crate) struct JsonClient {
    client: Client,
    timeout: Duration,
    backend: SourceTag,
}

impl JsonClient {
    pub(crate) fn new(backend: SourceTag, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QrngError::transport(backend, format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            timeout,
            backend,
        })
    }

    /// Issue one GET and parse the body as JSON. Any network failure,
    /// timeout or non-2xx status is a transport error; an unparseable body
    /// is a format error.
    pub(crate) fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> Result<Value> {
        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let body = request
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|e| self.transport_error(e))?;

        serde_json::from_str(&body).map_err(|_| {
            let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
            QrngError::format(self.backend, format!("invalid JSON response: {excerpt}"))
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> QrngError {
        if e.is_timeout() {
            QrngError::transport(
                self.backend,
                format!("timed out after {:.1}s", self.timeout.as_secs_f64()),
            )
        } else {
            QrngError::transport(self.backend, e.to_string())
        }
    }
}

/// Remote sources for the given settings in probing order: LFDR, then ANU.
pub fn remote_sources(settings: &Settings) -> Result<Vec<Box<dyn EntropySource>>> {
    let sources: Vec<Box<dyn EntropySource>> = vec![
        Box::new(LfdrSource::new(settings)?),
        Box::new(AnuSource::new(settings)?),
    ];
    Ok(sources)
}
