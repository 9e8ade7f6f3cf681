//! Error taxonomy for entropy acquisition and sampling.
//!
//! Every remote backend reports one of [`QrngError::Transport`],
//! [`QrngError::Format`], [`QrngError::Shape`] or [`QrngError::Config`].
//! The [`FallbackProvider`](crate::provider::FallbackProvider) swallows these
//! while it still has backends to try and only surfaces them, in attempt
//! order, inside [`QrngError::Aggregate`].

use thiserror::Error;

use crate::source::SourceTag;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QrngError {
    /// Network failure, timeout, or non-success HTTP status.
    #[error("request failed: {message}")]
    Transport { backend: SourceTag, message: String },

    /// Response body malformed or missing the expected field.
    #[error("malformed response: {message}")]
    Format { backend: SourceTag, message: String },

    /// Returned length differs from the requested length.
    #[error("returned {actual} bytes, expected {expected}")]
    Shape {
        backend: Option<SourceTag>,
        expected: usize,
        actual: usize,
    },

    /// Required credential or setting missing.
    #[error("{message}")]
    Config { backend: SourceTag, message: String },

    /// Caller asked for something outside the supported bounds.
    #[error("{parameter} must be {expected}, got {value}")]
    Range {
        parameter: &'static str,
        value: u64,
        expected: &'static str,
    },

    /// Every configured backend failed, and the local fallback was disabled
    /// or failed too.
    #[error("All QRNG backends failed: {}", join_failures(.failures))]
    Aggregate { failures: Vec<QrngError> },
}

impl QrngError {
    /// Backend this error is attributed to, if any.
    pub fn backend(&self) -> Option<SourceTag> {
        match self {
            Self::Transport { backend, .. }
            | Self::Format { backend, .. }
            | Self::Config { backend, .. } => Some(*backend),
            Self::Shape { backend, .. } => *backend,
            Self::Range { .. } | Self::Aggregate { .. } => None,
        }
    }

    pub(crate) fn transport(backend: SourceTag, message: impl Into<String>) -> Self {
        Self::Transport {
            backend,
            message: message.into(),
        }
    }

    pub(crate) fn format(backend: SourceTag, message: impl Into<String>) -> Self {
        Self::Format {
            backend,
            message: message.into(),
        }
    }

    pub(crate) fn length(value: usize) -> Self {
        Self::Range {
            parameter: "length",
            value: value as u64,
            expected: ">= 1",
        }
    }
}

/// Render failures as `"LFDR: reason | ANU: reason"`.
fn join_failures(failures: &[QrngError]) -> String {
    failures
        .iter()
        .map(|e| match e.backend() {
            Some(tag) => format!("{tag}: {e}"),
            None => e.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub type Result<T> = std::result::Result<T, QrngError>;
