//! Entropy source traits and provenance records.
//!
//! Every backend implements [`EntropySource`], which provides metadata via
//! [`SourceInfo`] and a single-shot `fetch`. Anything that can hand out bytes
//! on demand implements [`ByteSource`]; the sampler only ever talks to that.

use std::time::Duration;

use serde::Serialize;

use crate::error::Result;

/// Provenance tag recorded with every successful draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceTag {
    /// LFDR QRNG service (hex payload).
    Lfdr,
    /// ANU quantum numbers service (uint8 array payload, API key required).
    Anu,
    /// Local OS randomness, used only as an explicitly enabled last resort.
    Classic,
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Lfdr => "LFDR",
            Self::Anu => "ANU",
            Self::Classic => "CLASSIC",
        })
    }
}

/// Metadata about an entropy source.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Unique identifier (e.g. `"lfdr"`).
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    /// Tag written to the provider history on success.
    pub tag: SourceTag,
    /// Whether fetching goes over the network.
    pub remote: bool,
}

/// A single backend. One call is one request: implementations never retry
/// and never substitute bytes from elsewhere.
pub trait EntropySource: Send + Sync {
    /// Source metadata.
    fn info(&self) -> &SourceInfo;

    /// Fetch exactly `length` bytes or fail with a backend-specific error.
    fn fetch(&self, length: usize) -> Result<Vec<u8>>;

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Convenience: tag from info.
    fn tag(&self) -> SourceTag {
        self.info().tag
    }
}

/// Capability the sampler draws from.
pub trait ByteSource {
    /// Return `length` bytes.
    fn get_bytes(&self, length: usize) -> Result<Vec<u8>>;
}

/// One successful acquisition, kept for audit and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntropyDraw {
    pub source_tag: SourceTag,
    #[serde(serialize_with = "serialize_hex")]
    pub payload: Vec<u8>,
}

impl EntropyDraw {
    pub fn new(source_tag: SourceTag, payload: Vec<u8>) -> Self {
        Self {
            source_tag,
            payload,
        }
    }

    /// Payload as lowercase hex.
    pub fn payload_hex(&self) -> String {
        hex::encode(&self.payload)
    }
}

fn serialize_hex<S: serde::Serializer>(
    bytes: &[u8],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

/// Runtime bookkeeping for a registered source in the provider.
pub struct SourceState {
    pub source: Box<dyn EntropySource>,
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub total_bytes: u64,
    pub last_error: Option<String>,
    pub last_fetch_time: Duration,
}

impl SourceState {
    pub fn new(source: Box<dyn EntropySource>) -> Self {
        Self {
            source,
            attempts: 0,
            successes: 0,
            failures: 0,
            total_bytes: 0,
            last_error: None,
            last_fetch_time: Duration::ZERO,
        }
    }
}
