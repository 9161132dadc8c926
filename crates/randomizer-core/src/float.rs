//! Float sampling.
//!
//! [`next_float`] keeps exactly the 53 bits a double can represent.
//! Interval sampling uses Goualard's γ-section algorithm: the interval is
//! cut into `hi` equal steps of size `g`, the largest spacing between
//! adjacent floats in the interval, and one step index is drawn uniformly.
//! Every returned value is therefore exactly representable and the
//! boundaries are included or excluded precisely as requested.

use serde::{Deserialize, Serialize};

use crate::engine::{Engine, RetryBudget};
use crate::error::RandomError;
use crate::range::{bounded_u64, draw_u64};

/// `2^-53`, the spacing of the values [`next_float`] can return.
const STEP_SIZE: f64 = 1.0 / 9_007_199_254_740_992.0;

/// Which ends of a float interval may be returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntervalBoundary {
    /// `[min, max)`
    #[default]
    ClosedOpen,
    /// `[min, max]`
    ClosedClosed,
    /// `(min, max]`
    OpenClosed,
    /// `(min, max)`
    OpenOpen,
}

/// Returns a float in `[0, 1)` built from the top 53 bits of a 64-bit draw.
///
/// # Errors
///
/// Propagates engine failures.
#[allow(clippy::cast_precision_loss)]
pub fn next_float<E: Engine + ?Sized>(engine: &mut E) -> Result<f64, RandomError> {
    let word = draw_u64(engine)?;
    // The low bits of several engines are weaker; keep the high ones.
    Ok((word >> 11) as f64 * STEP_SIZE)
}

/// Returns a float uniformly distributed over the interval described by
/// `min`, `max` and `boundary`.
///
/// # Errors
///
/// - `RandomError::InvalidArgument` if a bound is not finite or the bounds
///   are inverted for the requested boundary.
/// - `RandomError::EmptyInterval` if an open interval holds no float.
/// - Engine and retry-budget failures are propagated.
#[allow(clippy::float_cmp)]
pub fn get_float<E: Engine + ?Sized>(
    engine: &mut E,
    min: f64,
    max: f64,
    boundary: IntervalBoundary,
    budget: RetryBudget,
) -> Result<f64, RandomError> {
    if !min.is_finite() {
        return Err(RandomError::InvalidArgument("min must be finite".to_owned()));
    }
    if !max.is_finite() {
        return Err(RandomError::InvalidArgument("max must be finite".to_owned()));
    }

    let value = match boundary {
        IntervalBoundary::ClosedOpen => {
            require_greater(min, max)?;
            closed_open(engine, min, max, budget)?
        }
        IntervalBoundary::ClosedClosed => {
            if max < min {
                return Err(RandomError::InvalidArgument(
                    "max must be greater than or equal to min".to_owned(),
                ));
            }
            closed_closed(engine, min, max, budget)?
        }
        IntervalBoundary::OpenClosed => {
            require_greater(min, max)?;
            open_closed(engine, min, max, budget)?
        }
        IntervalBoundary::OpenOpen => {
            if max == min {
                return Err(RandomError::EmptyInterval { min, max });
            }
            require_greater(min, max)?;
            open_open(engine, min, max, budget)?
        }
    };

    if value.is_nan() {
        return Err(RandomError::EmptyInterval { min, max });
    }
    Ok(value)
}

fn require_greater(min: f64, max: f64) -> Result<(), RandomError> {
    if max <= min {
        return Err(RandomError::InvalidArgument(
            "max must be greater than min".to_owned(),
        ));
    }
    Ok(())
}

/// Next float toward `f64::MAX`; `f64::MAX` itself does not move.
#[allow(clippy::float_cmp)]
fn step_up(x: f64) -> f64 {
    if x == f64::MAX {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Next float toward `-f64::MAX`; `-f64::MAX` itself does not move.
#[allow(clippy::float_cmp)]
fn step_down(x: f64) -> f64 {
    if x == -f64::MAX {
        return x;
    }
    if x == 0.0 {
        return -f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits - 1)
    } else {
        f64::from_bits(bits + 1)
    }
}

fn gamma_low(x: f64) -> f64 {
    x - step_down(x)
}

fn gamma_high(x: f64) -> f64 {
    step_up(x) - x
}

/// Largest float spacing inside `[a, b]`.
fn gamma_max(a: f64, b: f64) -> f64 {
    if a.abs() > b.abs() {
        gamma_high(a)
    } else {
        gamma_low(b)
    }
}

/// Number of `g`-sized steps needed to cover `[a, b]`, computed without
/// overflow and corrected for the rounding error of the division.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)]
fn ceilint(a: f64, b: f64, g: f64) -> u64 {
    let s = b / g - a / g;
    let e = if a.abs() <= b.abs() {
        -a / g - (s - b / g)
    } else {
        b / g - (s + a / g)
    };
    let si = s.ceil();

    if s == si {
        si as u64 + u64::from(e > 0.0)
    } else {
        si as u64
    }
}

/// Splits `k` so that `4 * hi + lo == k` with both halves exact in `f64`.
#[allow(clippy::cast_precision_loss)]
fn split(k: u64) -> (f64, f64) {
    ((k >> 2) as f64, (k & 0x3) as f64)
}

fn down_from_max(max: f64, k: u64, g: f64) -> f64 {
    let (k_hi, k_lo) = split(k);
    4.0 * (max / 4.0 - k_hi * g) - k_lo * g
}

fn up_from_min(min: f64, k: u64, g: f64) -> f64 {
    let (k_hi, k_lo) = split(k);
    4.0 * (min / 4.0 + k_hi * g) + k_lo * g
}

fn closed_open<E: Engine + ?Sized>(
    engine: &mut E,
    min: f64,
    max: f64,
    budget: RetryBudget,
) -> Result<f64, RandomError> {
    let g = gamma_max(min, max);
    let hi = ceilint(min, max, g);
    if max <= min || hi < 1 {
        return Ok(f64::NAN);
    }

    // k in [1, hi]
    let k = 1 + bounded_u64(engine, hi - 1, budget)?;

    if min.abs() <= max.abs() {
        if k == hi {
            Ok(min)
        } else {
            Ok(down_from_max(max, k, g))
        }
    } else {
        Ok(up_from_min(min, k - 1, g))
    }
}

fn closed_closed<E: Engine + ?Sized>(
    engine: &mut E,
    min: f64,
    max: f64,
    budget: RetryBudget,
) -> Result<f64, RandomError> {
    let g = gamma_max(min, max);
    let hi = ceilint(min, max, g);
    if max < min {
        return Ok(f64::NAN);
    }

    // k in [0, hi]
    let k = bounded_u64(engine, hi, budget)?;

    if min.abs() <= max.abs() {
        if k == hi {
            Ok(min)
        } else {
            Ok(down_from_max(max, k, g))
        }
    } else if k == hi {
        Ok(max)
    } else {
        Ok(up_from_min(min, k, g))
    }
}

fn open_closed<E: Engine + ?Sized>(
    engine: &mut E,
    min: f64,
    max: f64,
    budget: RetryBudget,
) -> Result<f64, RandomError> {
    let g = gamma_max(min, max);
    let hi = ceilint(min, max, g);
    if max <= min || hi < 1 {
        return Ok(f64::NAN);
    }

    // k in [0, hi - 1]
    let k = bounded_u64(engine, hi - 1, budget)?;

    if min.abs() <= max.abs() {
        Ok(down_from_max(max, k, g))
    } else if k == hi - 1 {
        Ok(max)
    } else {
        Ok(up_from_min(min, k + 1, g))
    }
}

fn open_open<E: Engine + ?Sized>(
    engine: &mut E,
    min: f64,
    max: f64,
    budget: RetryBudget,
) -> Result<f64, RandomError> {
    let g = gamma_max(min, max);
    let hi = ceilint(min, max, g);
    if max <= min || hi < 2 {
        return Ok(f64::NAN);
    }

    // k in [1, hi - 1]
    let k = 1 + bounded_u64(engine, hi - 2, budget)?;

    if min.abs() <= max.abs() {
        Ok(down_from_max(max, k, g))
    } else {
        Ok(up_from_min(min, k, g))
    }
}
