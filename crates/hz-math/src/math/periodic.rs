//! Periodic wrapping of proposals onto a bounded interval.

/// Wrap `value` into `[lower, lower + range)` by modular arithmetic.
///
/// Matches a floored modulo: values below `lower` re-enter from the top.
/// Returns NaN for a non-positive or non-finite `range`, or a non-finite value.
pub fn wrap_periodic(value: f64, lower: f64, range: f64) -> f64 {
    if value.is_nan() || lower.is_nan() || range.is_nan() {
        return f64::NAN;
    }
    if range <= 0.0 || !range.is_finite() || !value.is_finite() {
        return f64::NAN;
    }
    let offset = (value - lower).rem_euclid(range);
    // rem_euclid can round up to exactly `range` for tiny negative offsets
    if offset >= range {
        return lower;
    }
    lower + offset
}
