//! Immutable backend configuration.
//!
//! The core never reads the process environment. Callers build a
//! [`Settings`] once at the boundary, usually via [`Settings::from_lookup`]
//! with `std::env::var`, and pass it down explicitly.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_LFDR_URL: &str = "https://lfdr.de/qrng_api/qrng";
pub const DEFAULT_ANU_URL: &str = "https://api.quantumnumbers.anu.edu.au";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

pub const LFDR_URL_KEY: &str = "LFDR_URL";
pub const ANU_URL_KEY: &str = "ANU_URL";
pub const ANU_API_KEY_KEY: &str = "ANU_API_KEY";
pub const TIMEOUT_KEY: &str = "QRNG_TIMEOUT_S";
pub const ALLOW_FALLBACK_KEY: &str = "QRNG_ALLOW_FALLBACK";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("{key} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { key: &'static str, value: String },
}

/// Backend URLs, credentials, per-request timeout and the local fallback gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub lfdr_url: String,
    pub anu_url: String,
    /// ANU API key. `None` disables the ANU backend with a config error.
    pub anu_key: Option<String>,
    /// Upper bound for a single backend request.
    pub timeout: Duration,
    /// Permit the local OS-randomness fallback once every remote backend failed.
    pub allow_fallback: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lfdr_url: DEFAULT_LFDR_URL.to_string(),
            anu_url: DEFAULT_ANU_URL.to_string(),
            anu_key: None,
            timeout: DEFAULT_TIMEOUT,
            allow_fallback: false,
        }
    }
}

impl Settings {
    /// Build settings from a key lookup, falling back to defaults for
    /// missing keys. An empty `ANU_API_KEY` counts as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout = match lookup(TIMEOUT_KEY) {
            Some(raw) => parse_timeout(&raw)?,
            None => defaults.timeout,
        };

        Ok(Self {
            lfdr_url: lookup(LFDR_URL_KEY).unwrap_or(defaults.lfdr_url),
            anu_url: lookup(ANU_URL_KEY).unwrap_or(defaults.anu_url),
            anu_key: lookup(ANU_API_KEY_KEY).filter(|k| !k.trim().is_empty()),
            timeout,
            allow_fallback: lookup(ALLOW_FALLBACK_KEY)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.allow_fallback),
        })
    }

    pub fn with_anu_key(mut self, key: impl Into<String>) -> Self {
        self.anu_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, SettingsError> {
    let secs: f64 = raw.trim().parse().map_err(|_| SettingsError::InvalidTimeout {
        key: TIMEOUT_KEY,
        value: raw.to_string(),
    })?;
    timeout_from_secs(TIMEOUT_KEY, secs)
}

/// Checked conversion of a timeout in seconds. Rejects zero, negative,
/// non-finite and values too large for a [`Duration`]; `key` names the
/// offending setting in the error.
pub fn timeout_from_secs(key: &'static str, secs: f64) -> Result<Duration, SettingsError> {
    let invalid = || SettingsError::InvalidTimeout {
        key,
        value: secs.to_string(),
    };
    if !secs.is_finite() || secs <= 0.0 {
        return Err(invalid());
    }
    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}

/// `1`, `true`, `yes` and `on` (any case) enable; everything else disables.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
