//! Casting: six bits for the base hexagram, then one bounded draw for the
//! moving line.
//!
//! The two draws are separate requests against the source, in that order.
//! For a given byte stream the result is fully determined, so the order is
//! part of the contract.

use log::debug;

use crate::error::{QrngError, Result};
use crate::hexagram::Hexagram;
use crate::sampler::{rand_bits, rand_int};
use crate::source::ByteSource;

/// Base hexagram, its moving line (1 = bottom, 6 = top) and the hexagram
/// obtained by flipping that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastingResult {
    base: Hexagram,
    changed: Hexagram,
    moving_line: u8,
}

impl CastingResult {
    /// Derive `changed` from `base` by flipping `moving_line`.
    pub fn new(base: Hexagram, moving_line: u8) -> Result<Self> {
        let out_of_range = || QrngError::Range {
            parameter: "moving_line",
            value: u64::from(moving_line),
            expected: "between 1 and 6",
        };
        if moving_line == 0 {
            return Err(out_of_range());
        }
        let changed = base
            .flip(usize::from(moving_line - 1))
            .map_err(|_| out_of_range())?;
        Ok(Self {
            base,
            changed,
            moving_line,
        })
    }

    pub fn base(&self) -> Hexagram {
        self.base
    }

    pub fn changed(&self) -> Hexagram {
        self.changed
    }

    /// 1-based, bottom to top.
    pub fn moving_line(&self) -> u8 {
        self.moving_line
    }
}

/// Cast one hexagram from `source`.
pub fn cast<S: ByteSource + ?Sized>(source: &S) -> Result<CastingResult> {
    let bits = rand_bits(source, Hexagram::LINES)?;
    let base = Hexagram::from_bits(&bits).map_err(|_| QrngError::Shape {
        backend: None,
        expected: Hexagram::LINES,
        actual: bits.len(),
    })?;

    let moving_line = rand_int(source, (Hexagram::LINES - 1) as u32)? + 1;
    debug!("cast {base} with moving line {moving_line}");

    CastingResult::new(base, moving_line)
}
