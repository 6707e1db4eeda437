//! Metropolis-Hastings acceptance.

/// `min(0, candidate - current + log_hastings)`.
///
/// Any `-inf` or NaN input that would poison the sum yields `-inf`, a sure
/// rejection, before the subtraction is attempted.
pub fn log_acceptance(candidate: f64, current: f64, log_hastings: f64) -> f64 {
    if log_hastings.is_nan() || log_hastings == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if candidate.is_nan() || candidate == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    let log_ratio = candidate - current + log_hastings;
    if log_ratio.is_nan() {
        return f64::NEG_INFINITY;
    }
    log_ratio.min(0.0)
}

/// Accept when `ln(uniform) <= log_acceptance`.
///
/// `log_acceptance == 0` accepts without looking at the uniform.
pub fn metropolis_accept(log_acceptance: f64, uniform: f64) -> bool {
    if log_acceptance >= 0.0 {
        return true;
    }
    if log_acceptance == f64::NEG_INFINITY || log_acceptance.is_nan() {
        return false;
    }
    uniform.ln() <= log_acceptance
}
