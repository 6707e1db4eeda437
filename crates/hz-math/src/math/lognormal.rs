//! Normal and log-normal densities for prior evaluation.
//!
//! # Parameterization
//!
//! `LogNormal(m, s)` is the law of `exp(Z)` with `Z ~ Normal(m, s)`, so `m`
//! and `s` are the mean and standard deviation of the *log* of the variable.
//! The density is:
//!
//! `f(x) = 1 / (x s sqrt(2 pi)) * exp(-(ln x - m)^2 / (2 s^2))`

const LOG_SQRT_2PI: f64 = 0.918_938_533_204_672_8; // 0.5 * ln(2*pi)

/// Log of the Normal(mean, sd) density at x.
///
/// Returns NaN for a non-positive or non-finite `sd`.
pub fn normal_log_pdf(x: f64, mean: f64, sd: f64) -> f64 {
    if x.is_nan() || mean.is_nan() || sd.is_nan() {
        return f64::NAN;
    }
    if sd <= 0.0 || !sd.is_finite() {
        return f64::NAN;
    }
    if x.is_infinite() {
        return f64::NEG_INFINITY;
    }
    let z = (x - mean) / sd;
    -0.5 * z * z - sd.ln() - LOG_SQRT_2PI
}

/// Log of the LogNormal(log_mean, log_sd) density at x.
///
/// Zero density (NEG_INFINITY) for x <= 0.
pub fn lognormal_log_pdf(x: f64, log_mean: f64, log_sd: f64) -> f64 {
    if x.is_nan() || log_mean.is_nan() || log_sd.is_nan() {
        return f64::NAN;
    }
    if log_sd <= 0.0 || !log_sd.is_finite() {
        return f64::NAN;
    }
    if x <= 0.0 || x.is_infinite() {
        return f64::NEG_INFINITY;
    }
    let ln_x = x.ln();
    normal_log_pdf(ln_x, log_mean, log_sd) - ln_x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_normal_at_zero() {
        let out = normal_log_pdf(0.0, 0.0, 1.0);
        assert!((out + LOG_SQRT_2PI).abs() < 1e-15);
    }

    #[test]
    fn normal_is_symmetric_about_mean() {
        let left = normal_log_pdf(1.5, 3.0, 0.7);
        let right = normal_log_pdf(4.5, 3.0, 0.7);
        assert!((left - right).abs() < 1e-12);
    }

    #[test]
    fn normal_rejects_bad_sd() {
        assert!(normal_log_pdf(0.0, 0.0, 0.0).is_nan());
        assert!(normal_log_pdf(0.0, 0.0, -1.0).is_nan());
        assert!(normal_log_pdf(0.0, 0.0, f64::INFINITY).is_nan());
    }

    #[test]
    fn lognormal_known_value() {
        // LogNormal(0, 1) at x = 1 equals the standard normal density at 0.
        let out = lognormal_log_pdf(1.0, 0.0, 1.0);
        assert!((out + LOG_SQRT_2PI).abs() < 1e-15);
    }

    #[test]
    fn lognormal_is_normal_minus_jacobian() {
        let x: f64 = 25.0;
        let out = lognormal_log_pdf(x, 3.0, 0.8);
        let expected = normal_log_pdf(x.ln(), 3.0, 0.8) - x.ln();
        assert!((out - expected).abs() < 1e-12);
    }

    #[test]
    fn lognormal_zero_outside_support() {
        assert_eq!(lognormal_log_pdf(0.0, 0.0, 1.0), f64::NEG_INFINITY);
        assert_eq!(lognormal_log_pdf(-3.0, 0.0, 1.0), f64::NEG_INFINITY);
    }
}
