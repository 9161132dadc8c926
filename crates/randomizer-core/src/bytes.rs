//! Byte-string generation.

use crate::engine::{Engine, Generated, RetryBudget};
use crate::error::RandomError;
use crate::range::smear_u64;

/// Every byte lane of a `u64` set to one.
const BYTE_LANES: u64 = 0x0101_0101_0101_0101;

/// Returns exactly `length` random bytes.
///
/// While at least eight bytes remain, full 64-bit results are copied whole
/// in little-endian order. The first narrower result switches the call to
/// peeling one byte at a time, lowest byte first.
///
/// # Errors
///
/// Returns `RandomError::InvalidArgument` if `length` is zero and
/// propagates engine failures. No partial buffer is ever returned.
pub fn fill<E: Engine + ?Sized>(engine: &mut E, length: usize) -> Result<Vec<u8>, RandomError> {
    if length == 0 {
        return Err(RandomError::InvalidArgument(
            "length must be greater than 0".to_owned(),
        ));
    }

    let mut out = vec![0u8; length];
    let mut filled = 0;
    let mut pending: Option<Generated> = None;

    while filled + 8 <= length {
        let result = engine.generate()?;
        if result.width() != 8 {
            pending = Some(result);
            break;
        }
        out[filled..filled + 8].copy_from_slice(&result.value().to_le_bytes());
        filled += 8;
    }

    while filled < length {
        let result = match pending.take() {
            Some(result) => result,
            None => engine.generate()?,
        };
        filled += peel(&mut out[filled..], result);
    }

    Ok(out)
}

/// Writes the valid bytes of `result` into `out`, lowest first, and returns
/// how many were written.
#[allow(clippy::cast_possible_truncation)]
fn peel(out: &mut [u8], result: Generated) -> usize {
    let mut value = result.value();
    let count = result.width().min(out.len());
    for byte in &mut out[..count] {
        *byte = (value & 0xff) as u8;
        value >>= 8;
    }
    count
}

/// Returns `length` bytes, each chosen uniformly from `source`.
///
/// Alphabets longer than 256 bytes draw every offset through the engine's
/// ranged sampler. Shorter ones mask every byte of a raw result down to the
/// smallest power of two covering the largest offset and reject bytes that
/// land past it; a rejection consumes the byte and moves on to the next one.
///
/// # Errors
///
/// - `RandomError::InvalidArgument` if `source` is empty or `length` is zero.
/// - `RandomError::BrokenEngine` once more than `budget` consecutive bytes
///   are rejected.
/// - Engine failures are propagated.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn from_alphabet<E: Engine + ?Sized>(
    engine: &mut E,
    source: &[u8],
    length: usize,
    budget: RetryBudget,
) -> Result<Vec<u8>, RandomError> {
    if source.is_empty() {
        return Err(RandomError::InvalidArgument(
            "source must not be empty".to_owned(),
        ));
    }
    if length == 0 {
        return Err(RandomError::InvalidArgument(
            "length must be greater than 0".to_owned(),
        ));
    }

    let max_offset = source.len() - 1;
    let mut out = Vec::with_capacity(length);

    if max_offset > 0xff {
        while out.len() < length {
            let offset = engine.range(0, max_offset as i64, budget)?;
            let byte = usize::try_from(offset)
                .ok()
                .and_then(|offset| source.get(offset))
                .ok_or_else(|| {
                    RandomError::BrokenEngine(format!(
                        "engine range returned {offset}, outside [0, {max_offset}]"
                    ))
                })?;
            out.push(*byte);
        }
        return Ok(out);
    }

    let mask = smear_u64(max_offset as u64) * BYTE_LANES;
    let mut failures = 0;

    while out.len() < length {
        let result = engine.generate()?;
        let mut offsets = result.value() & mask;

        for _ in 0..result.width() {
            let offset = (offsets & 0xff) as usize;
            offsets >>= 8;

            if offset > max_offset {
                budget.reject(&mut failures)?;
                continue;
            }

            failures = 0;
            out.push(source[offset]);
            if out.len() == length {
                break;
            }
        }
    }

    Ok(out)
}
