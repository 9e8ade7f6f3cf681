//! Ordered fallback across entropy sources with provenance history.
//!
//! Behaviour:
//! 1. Try each remote source strictly in registration order, one attempt each
//! 2. First success is recorded in the history and returned
//! 3. Failures are collected, logged and counted, but never recorded in the history
//! 4. When every remote source failed, draw from the local fallback if enabled
//! 5. Otherwise fail with an aggregate of every failure, in attempt order
//!
//! History and per-source state sit behind mutexes, so a provider can be
//! shared by reference between threads. Attempts are still sequential.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use log::{debug, info, warn};

use crate::error::{QrngError, Result};
use crate::settings::Settings;
use crate::source::{ByteSource, EntropyDraw, EntropySource, SourceState, SourceTag};
use crate::sources::{LocalSource, remote_sources};

/// Entropy provider that walks an ordered chain of sources.
pub struct FallbackProvider {
    sources: Vec<Mutex<SourceState>>,
    fallback: Option<Mutex<SourceState>>,
    history: Mutex<Vec<EntropyDraw>>,
}

impl FallbackProvider {
    /// Create a provider with no sources and the local fallback disabled.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            fallback: None,
            history: Mutex::new(Vec::new()),
        }
    }

    /// The standard chain: LFDR, then ANU, then local randomness when
    /// `settings.allow_fallback` is set.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut provider = Self::new();
        for source in remote_sources(settings)? {
            provider.add_source(source);
        }
        if settings.allow_fallback {
            provider.set_local_fallback(Some(Box::new(LocalSource::new())));
        }
        Ok(provider)
    }

    /// Append a source to the end of the probing order.
    pub fn add_source(&mut self, source: Box<dyn EntropySource>) {
        self.sources.push(Mutex::new(SourceState::new(source)));
    }

    /// Builder form of [`add_source`](Self::add_source).
    pub fn with_source(mut self, source: Box<dyn EntropySource>) -> Self {
        self.add_source(source);
        self
    }

    /// Enable (`Some`) or disable (`None`) the last-resort source.
    pub fn set_local_fallback(&mut self, source: Option<Box<dyn EntropySource>>) {
        self.fallback = source.map(|s| Mutex::new(SourceState::new(s)));
    }

    /// Builder form of [`set_local_fallback`](Self::set_local_fallback).
    pub fn with_local_fallback(mut self, source: Box<dyn EntropySource>) -> Self {
        self.set_local_fallback(Some(source));
        self
    }

    /// Number of sources in the chain, not counting the local fallback.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn fallback_enabled(&self) -> bool {
        self.fallback.is_some()
    }

    /// Return exactly `length` bytes from the first source that delivers.
    pub fn get_bytes(&self, length: usize) -> Result<Vec<u8>> {
        if length == 0 {
            return Err(QrngError::length(length));
        }

        let mut failures = Vec::new();
        for state in &self.sources {
            match Self::try_source(state, length) {
                Ok((tag, data)) => {
                    self.record(tag, &data);
                    return Ok(data);
                }
                Err(e) => failures.push(e),
            }
        }

        if let Some(state) = &self.fallback {
            info!(
                "all {} remote sources failed, using local fallback",
                self.sources.len()
            );
            match Self::try_source(state, length) {
                Ok((tag, data)) => {
                    self.record(tag, &data);
                    return Ok(data);
                }
                Err(e) => failures.push(e),
            }
        }

        Err(QrngError::Aggregate { failures })
    }

    /// One attempt against one source, with bookkeeping.
    fn try_source(state: &Mutex<SourceState>, length: usize) -> Result<(SourceTag, Vec<u8>)> {
        let mut ss = lock(state);
        let tag = ss.source.tag();
        debug!("requesting {length} bytes from {}", ss.source.name());

        ss.attempts += 1;
        let t0 = Instant::now();
        let result = ss.source.fetch(length).and_then(|data| {
            if data.len() == length {
                Ok(data)
            } else {
                Err(QrngError::Shape {
                    backend: Some(tag),
                    expected: length,
                    actual: data.len(),
                })
            }
        });
        ss.last_fetch_time = t0.elapsed();

        match result {
            Ok(data) => {
                ss.successes += 1;
                ss.total_bytes += data.len() as u64;
                ss.last_error = None;
                Ok((tag, data))
            }
            Err(e) => {
                warn!("{tag} failed: {e}");
                ss.failures += 1;
                ss.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn record(&self, tag: SourceTag, data: &[u8]) {
        lock(&self.history).push(EntropyDraw::new(tag, data.to_vec()));
    }

    /// Snapshot of every successful draw, in call order.
    pub fn history(&self) -> Vec<EntropyDraw> {
        lock(&self.history).clone()
    }

    /// Health report as structured data.
    pub fn health_report(&self) -> HealthReport {
        let history = lock(&self.history);
        let sources = self
            .sources
            .iter()
            .chain(self.fallback.iter())
            .map(|state| {
                let ss = lock(state);
                let info = ss.source.info();
                SourceHealth {
                    name: info.name.to_string(),
                    tag: info.tag,
                    remote: info.remote,
                    attempts: ss.attempts,
                    successes: ss.successes,
                    failures: ss.failures,
                    bytes: ss.total_bytes,
                    last_error: ss.last_error.clone(),
                    time: ss.last_fetch_time.as_secs_f64(),
                }
            })
            .collect();

        HealthReport {
            draws: history.len(),
            output_bytes: history.iter().map(|d| d.payload.len() as u64).sum(),
            fallback_enabled: self.fallback.is_some(),
            sources,
        }
    }

    /// Configured chain in probing order, local fallback last.
    pub fn source_infos(&self) -> Vec<SourceInfoSnapshot> {
        self.sources
            .iter()
            .chain(self.fallback.iter())
            .map(|state| {
                let ss = lock(state);
                let info = ss.source.info();
                SourceInfoSnapshot {
                    name: info.name.to_string(),
                    description: info.description.to_string(),
                    tag: info.tag,
                    remote: info.remote,
                }
            })
            .collect()
    }
}

impl Default for FallbackProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for FallbackProvider {
    fn get_bytes(&self, length: usize) -> Result<Vec<u8>> {
        FallbackProvider::get_bytes(self, length)
    }
}

/// The guarded data is append-only counters and logs, so a poisoned lock
/// still holds a consistent value.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Overall health report for the provider.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Successful draws recorded in the history.
    pub draws: usize,
    /// Total bytes handed out.
    pub output_bytes: u64,
    /// Whether the local fallback is part of the chain.
    pub fallback_enabled: bool,
    /// Per-source details, in probing order.
    pub sources: Vec<SourceHealth>,
}

/// Attempt statistics of a single source.
#[derive(Debug, Clone)]
pub struct SourceHealth {
    pub name: String,
    pub tag: SourceTag,
    pub remote: bool,
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    /// Bytes delivered by successful attempts.
    pub bytes: u64,
    /// Message of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
    /// Duration of the last attempt in seconds.
    pub time: f64,
}

/// Snapshot of source metadata for external consumption.
#[derive(Debug, Clone)]
pub struct SourceInfoSnapshot {
    pub name: String,
    pub description: String,
    pub tag: SourceTag,
    pub remote: bool,
}
