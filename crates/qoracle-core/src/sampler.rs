//! Turning raw bytes into bounded integers and bit sequences.
//!
//! Both functions work against any [`ByteSource`] and keep no state.
//! [`rand_int`] issues one single-byte request per attempt and may need
//! several; [`rand_bits`] always issues exactly one request.

use crate::error::{QrngError, Result};
use crate::source::ByteSource;

/// Largest `max_inclusive` a single byte can serve.
pub const MAX_BOUND: u32 = u8::MAX as u32;

/// Uniform integer in `[0, max_inclusive]` by rejection sampling.
///
/// Bytes at or above the largest multiple of `span = max_inclusive + 1` not
/// exceeding 256 are discarded, and a fresh byte is requested. Rejected
/// bytes are never reused.
pub fn rand_int<S: ByteSource + ?Sized>(source: &S, max_inclusive: u32) -> Result<u8> {
    if max_inclusive > MAX_BOUND {
        return Err(QrngError::Range {
            parameter: "max_inclusive",
            value: u64::from(max_inclusive),
            expected: "between 0 and 255",
        });
    }
    let span = max_inclusive + 1;
    let limit = rejection_limit(span);
    loop {
        let value = u32::from(single_byte(source)?);
        if value < limit {
            return Ok((value % span) as u8);
        }
    }
}

/// Exclusive upper bound of accepted byte values for `span` in `[1, 256]`.
pub fn rejection_limit(span: u32) -> u32 {
    (256 / span) * span
}

fn single_byte<S: ByteSource + ?Sized>(source: &S) -> Result<u8> {
    let bytes = source.get_bytes(1)?;
    match bytes.first() {
        Some(b) => Ok(*b),
        None => Err(QrngError::Shape {
            backend: None,
            expected: 1,
            actual: 0,
        }),
    }
}

/// `count` bits, least significant bit of each byte first, from a single
/// request of `ceil(count / 8)` bytes. Each element is 0 or 1.
pub fn rand_bits<S: ByteSource + ?Sized>(source: &S, count: usize) -> Result<Vec<u8>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let byte_len = count.div_ceil(8);
    let raw = source.get_bytes(byte_len)?;
    if raw.len() < byte_len {
        return Err(QrngError::Shape {
            backend: None,
            expected: byte_len,
            actual: raw.len(),
        });
    }
    Ok(unpack_lsb_first(&raw, count))
}

/// Unpack the first `count` bits of `bytes`, LSB first.
pub fn unpack_lsb_first(bytes: &[u8], count: usize) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|&b| (0..8).map(move |i| (b >> i) & 1))
        .take(count)
        .collect()
}
