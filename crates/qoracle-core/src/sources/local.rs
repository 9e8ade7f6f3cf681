//! Local OS randomness, the last link of the fallback chain.

use crate::error::{QrngError, Result};
use crate::source::{EntropySource, SourceInfo, SourceTag};

static LOCAL_INFO: SourceInfo = SourceInfo {
    name: "classic",
    description: "Operating system CSPRNG (not quantum), used only when explicitly allowed",
    tag: SourceTag::Classic,
    remote: false,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSource;

impl LocalSource {
    pub fn new() -> Self {
        Self
    }
}

impl EntropySource for LocalSource {
    fn info(&self) -> &SourceInfo {
        &LOCAL_INFO
    }

    fn fetch(&self, length: usize) -> Result<Vec<u8>> {
        if length == 0 {
            return Err(QrngError::length(length));
        }
        let mut buf = vec![0u8; length];
        // Only fails when the platform CSPRNG itself is unusable.
        getrandom::fill(&mut buf).map_err(|e| {
            QrngError::transport(SourceTag::Classic, format!("OS CSPRNG failed: {e}"))
        })?;
        Ok(buf)
    }
}
