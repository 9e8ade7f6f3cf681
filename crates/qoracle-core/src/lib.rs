//! # qoracle-core
//!
//! **Cast I Ching hexagrams from quantum random bytes.**
//!
//! `qoracle-core` fetches raw bytes from remote quantum random number
//! services, turns them into unbiased bits and bounded integers, and encodes
//! the result as a base hexagram, a moving line, and the changed hexagram.
//!
//! ## Quick Start
//!
//! ```no_run
//! use qoracle_core::{FallbackProvider, Settings, cast};
//!
//! let settings = Settings::from_lookup(|key| std::env::var(key).ok()).unwrap();
//! let provider = FallbackProvider::from_settings(&settings).unwrap();
//!
//! let result = cast(&provider).unwrap();
//! println!("{} → {}", result.base().display_name(), result.changed().display_name());
//!
//! for draw in provider.history() {
//!     println!("{}: {}", draw.source_tag, draw.payload_hex());
//! }
//! ```
//!
//! ## Architecture
//!
//! Sources → FallbackProvider (first success wins) → Sampler → Casting → Hexagram codec
//!
//! - **LFDR** and **ANU** are probed in that order, one request each.
//! - **CLASSIC** (OS randomness) is used only when enabled and only after
//!   every remote source failed.
//! - Bits are unpacked LSB first from one request; the moving line is drawn
//!   by rejection sampling, one byte per attempt.
//!
//! Every backend implements the [`EntropySource`] trait. Anything exposing
//! `get_bytes` through [`ByteSource`] can drive the sampler and [`cast`].

pub mod casting;
pub mod error;
pub mod hexagram;
pub mod provider;
pub mod sampler;
pub mod settings;
pub mod source;
pub mod sources;

pub use casting::{CastingResult, cast};
pub use error::{QrngError, Result};
pub use hexagram::{Hexagram, HexagramEntry, HexagramError, KING_WEN, Trigram, lookup};
pub use provider::{FallbackProvider, HealthReport, SourceHealth, SourceInfoSnapshot};
pub use sampler::{rand_bits, rand_int};
pub use settings::{Settings, SettingsError, timeout_from_secs};
pub use source::{ByteSource, EntropyDraw, EntropySource, SourceInfo, SourceTag};
pub use sources::{AnuSource, LfdrSource, LocalSource};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
