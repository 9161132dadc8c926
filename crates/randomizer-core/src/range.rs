//! Bias-free integer sampling over raw engine outputs.
//!
//! Spans that fit in 32 bits are served from 32-bit words and wider spans
//! from 64-bit words. A word is masked down to the smallest power of two
//! covering the span and rejected while it lands above the span.

use crate::engine::{Engine, EngineMode, RetryBudget};
use crate::error::RandomError;

/// Largest raw draw of the legacy generator after dropping its low bit.
pub const LEGACY_DRAW_MAX: u64 = 0x7FFF_FFFF;

/// Returns a uniformly distributed integer in `[min, max]`.
///
/// # Errors
///
/// Returns `RandomError::InvalidRange` if `max < min`, propagates engine
/// failures, and returns `RandomError::BrokenEngine` once the retry budget
/// is exhausted.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub fn uniform<E: Engine + ?Sized>(
    engine: &mut E,
    min: i64,
    max: i64,
    budget: RetryBudget,
) -> Result<i64, RandomError> {
    if max < min {
        return Err(RandomError::InvalidRange(
            "max must be greater than or equal to min".to_owned(),
        ));
    }

    let span = (max as u64).wrapping_sub(min as u64);
    let offset = if span > u64::from(u32::MAX) {
        bounded_u64(engine, span, budget)?
    } else {
        u64::from(bounded_u32(engine, span as u32, budget)?)
    };

    Ok((min as u64).wrapping_add(offset) as i64)
}

/// Returns an integer in `[min, max]` using the engine's mode.
///
/// Legacy engines take the historical scaling formula; everything else goes
/// through the engine's own ranged sampler.
///
/// # Errors
///
/// Same as [`uniform`], plus `RandomError::BrokenEngine` if the engine's
/// ranged sampler returns a value outside `[min, max]`.
pub fn ranged<E: Engine + ?Sized>(
    engine: &mut E,
    min: i64,
    max: i64,
    budget: RetryBudget,
) -> Result<i64, RandomError> {
    if max < min {
        return Err(RandomError::InvalidRange(
            "max must be greater than or equal to min".to_owned(),
        ));
    }

    match engine.mode() {
        EngineMode::LegacyScaling => legacy_scaled(engine, min, max),
        EngineMode::Standard => {
            let value = engine.range(min, max, budget)?;
            if !(min..=max).contains(&value) {
                return Err(RandomError::BrokenEngine(format!(
                    "engine range returned {value}, outside [{min}, {max}]"
                )));
            }
            Ok(value)
        }
    }
}

/// Maps one legacy draw onto `[min, max]` with floating-point scaling.
///
/// The result is biased for spans that do not divide the draw range. The
/// formula must stay exactly as it is: outputs have to match the historical
/// generator bit for bit. Computing in `f64` avoids overflow when the span
/// exceeds `i64::MAX`.
///
/// # Errors
///
/// Propagates engine failures.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]
pub fn legacy_scaled<E: Engine + ?Sized>(
    engine: &mut E,
    min: i64,
    max: i64,
) -> Result<i64, RandomError> {
    let draw = engine.generate()?.value() >> 1;
    let offset = ((max as f64 - min as f64 + 1.0) * (draw as f64 / (LEGACY_DRAW_MAX as f64 + 1.0)))
        as u64;
    Ok(offset.wrapping_add(min as u64) as i64)
}

/// Returns a uniformly distributed `u64` in `[0, umax]` drawn from 64-bit words.
///
/// # Errors
///
/// Propagates engine failures and retry-budget exhaustion.
pub fn bounded_u64<E: Engine + ?Sized>(
    engine: &mut E,
    umax: u64,
    budget: RetryBudget,
) -> Result<u64, RandomError> {
    let mask = smear_u64(umax);
    let mut failures = 0;
    loop {
        let candidate = draw_u64(engine)? & mask;
        if candidate <= umax {
            return Ok(candidate);
        }
        budget.reject(&mut failures)?;
    }
}

/// Returns a uniformly distributed `u32` in `[0, umax]` drawn from 32-bit words.
///
/// # Errors
///
/// Propagates engine failures and retry-budget exhaustion.
pub fn bounded_u32<E: Engine + ?Sized>(
    engine: &mut E,
    umax: u32,
    budget: RetryBudget,
) -> Result<u32, RandomError> {
    let mask = smear_u32(umax);
    let mut failures = 0;
    loop {
        let candidate = draw_u32(engine)? & mask;
        if candidate <= umax {
            return Ok(candidate);
        }
        budget.reject(&mut failures)?;
    }
}

/// Collects at least eight bytes of engine output into one little-endian word.
///
/// # Errors
///
/// Propagates engine failures.
pub fn draw_u64<E: Engine + ?Sized>(engine: &mut E) -> Result<u64, RandomError> {
    let mut word = 0u64;
    let mut total = 0;
    while total < 8 {
        let result = engine.generate()?;
        word |= result.value() << (total * 8);
        total += result.width();
    }
    Ok(word)
}

/// Collects at least four bytes of engine output into one little-endian word.
///
/// # Errors
///
/// Propagates engine failures.
#[allow(clippy::cast_possible_truncation)]
pub fn draw_u32<E: Engine + ?Sized>(engine: &mut E) -> Result<u32, RandomError> {
    let mut word = 0u32;
    let mut total = 0;
    while total < 4 {
        let result = engine.generate()?;
        word |= (result.value() as u32) << (total * 8);
        total += result.width();
    }
    Ok(word)
}

/// Smallest `2^n - 1` that is `>= value`.
pub(crate) fn smear_u64(value: u64) -> u64 {
    if value == 0 {
        0
    } else {
        u64::MAX >> value.leading_zeros()
    }
}

fn smear_u32(value: u32) -> u32 {
    if value == 0 {
        0
    } else {
        u32::MAX >> value.leading_zeros()
    }
}
