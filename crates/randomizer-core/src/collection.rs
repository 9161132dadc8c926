//! Collection randomizers: shuffles and key picking.

use crate::engine::{Engine, RetryBudget};
use crate::error::RandomError;

/// Draws an index in `[0, upper]` through the engine's ranged sampler.
fn draw_index<E: Engine + ?Sized>(
    engine: &mut E,
    upper: usize,
    budget: RetryBudget,
) -> Result<usize, RandomError> {
    let max = i64::try_from(upper)
        .map_err(|_| RandomError::InvalidRange(format!("index {upper} exceeds i64::MAX")))?;
    let drawn = engine.range(0, max, budget)?;
    usize::try_from(drawn)
        .ok()
        .filter(|index| *index <= upper)
        .ok_or_else(|| {
            RandomError::BrokenEngine(format!("engine range returned {drawn}, outside [0, {upper}]"))
        })
}

/// Permutes `items` in place with a Fisher-Yates shuffle.
///
/// Walks `i` from the last index down to 1 and swaps `items[i]` with
/// `items[range(0, i)]`.
///
/// # Errors
///
/// Propagates engine and retry-budget failures; `items` may then be
/// partially permuted, so callers shuffle a copy.
pub fn shuffle<E: Engine + ?Sized, T>(
    engine: &mut E,
    items: &mut [T],
    budget: RetryBudget,
) -> Result<(), RandomError> {
    for i in (1..items.len()).rev() {
        let j = draw_index(engine, i, budget)?;
        if j != i {
            items.swap(i, j);
        }
    }
    Ok(())
}

/// Picks `count` distinct keys uniformly at random without replacement.
///
/// Keys are visited in iteration order. The first `count` fill the
/// reservoir; key `i` after that replaces slot `range(0, i)` when the draw
/// lands inside the reservoir. The result is in reservoir order.
///
/// # Errors
///
/// Returns `RandomError::InvalidRange` if `count` exceeds the number of
/// keys, and propagates engine and retry-budget failures.
pub fn pick_keys<E, K, I>(
    engine: &mut E,
    keys: I,
    count: usize,
    budget: RetryBudget,
) -> Result<Vec<K>, RandomError>
where
    E: Engine + ?Sized,
    I: IntoIterator<Item = K>,
    I::IntoIter: ExactSizeIterator,
{
    let keys = keys.into_iter();
    let available = keys.len();
    if count > available {
        return Err(RandomError::InvalidRange(format!(
            "count must be between 0 and the number of keys ({available}), got {count}"
        )));
    }

    let mut reservoir = Vec::with_capacity(count);
    if count == 0 {
        return Ok(reservoir);
    }

    for (i, key) in keys.enumerate() {
        if i < count {
            reservoir.push(key);
            continue;
        }
        let slot = draw_index(engine, i, budget)?;
        if slot < count {
            reservoir[slot] = key;
        }
    }

    Ok(reservoir)
}
