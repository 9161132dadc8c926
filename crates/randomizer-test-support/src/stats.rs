//! Statistical helpers for distribution tests.

/// Pearson's chi-square statistic of `observed` counts against a uniform
/// expectation over all buckets.
///
/// # Panics
///
/// Panics if `observed` is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn chi_square(observed: &[u64]) -> f64 {
    assert!(!observed.is_empty(), "chi_square needs at least one bucket");
    let total: u64 = observed.iter().sum();
    let expected = total as f64 / observed.len() as f64;
    observed
        .iter()
        .map(|&count| {
            let diff = count as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Upper critical value of the chi-square distribution at p = 0.9999 for
/// `buckets - 1` degrees of freedom (Wilson–Hilferty approximation).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn chi_square_limit(buckets: usize) -> f64 {
    const Z: f64 = 3.719;
    let df = (buckets - 1) as f64;
    let term = 2.0 / (9.0 * df);
    df * (1.0 - term + Z * term.sqrt()).powi(3)
}
