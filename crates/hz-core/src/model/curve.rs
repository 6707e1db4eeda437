use hz_math::{log_add_exp, log_ratio_to_successor, log_sum_exp};

use super::HazardParams;

/// A hazard model tabulated on the scores `0..horizon`.
///
/// The effective average decays from `mu0` towards `mu1`:
/// `mu[x] = mu1 + (mu0 - mu1) * exp(-x / L)`. The probability of being
/// dismissed on score `x`, given the batter reached it, is `1 / (mu[x] + 1)`.
///
/// Every table is derived from the parameters in one pass; there is no way
/// to change parameters without recomputing the whole curve.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardCurve {
    params: HazardParams,
    effective_average: Vec<f64>,
    log_survival: Vec<f64>,
    log_pmf: Vec<f64>,
    expected_average: f64,
}

impl HazardCurve {
    /// Tabulate the curve for `params` on `0..horizon`.
    pub fn compute(params: HazardParams, horizon: usize) -> Self {
        let mu0 = params.mu0();
        let mu1 = params.mu1();
        let length = params.length();

        let mut effective_average = Vec::with_capacity(horizon);
        let mut log_survival = Vec::with_capacity(horizon);
        let mut log_pmf = Vec::with_capacity(horizon);
        let mut expected_average = 0.0;

        let mut log_s = 0.0;
        for x in 0..horizon {
            let score = x as f64;
            let mu = effective_average_at(mu0, mu1, -score / length);
            let log_f = log_s - mu.ln_1p();

            effective_average.push(mu);
            log_survival.push(log_s);
            log_pmf.push(log_f);
            expected_average += score * log_f.exp();

            log_s += log_ratio_to_successor(mu);
        }

        Self {
            params,
            effective_average,
            log_survival,
            log_pmf,
            expected_average,
        }
    }

    pub fn params(&self) -> HazardParams {
        self.params
    }

    pub fn horizon(&self) -> usize {
        self.log_pmf.len()
    }

    /// `mu[x]` for each tabulated score.
    pub fn effective_average(&self) -> &[f64] {
        &self.effective_average
    }

    /// `ln P(score >= x)`, with `log_survival[0] == 0`.
    pub fn log_survival(&self) -> &[f64] {
        &self.log_survival
    }

    /// `ln P(dismissed on exactly x)`.
    pub fn log_pmf(&self) -> &[f64] {
        &self.log_pmf
    }

    /// `sum x * P(x)` over the horizon.
    ///
    /// Biased low by the mass beyond the horizon; see
    /// [`HazardCurve::log_tail_mass`].
    pub fn expected_average(&self) -> f64 {
        self.expected_average
    }

    /// Log of the total dismissal probability inside the horizon.
    pub fn log_captured_mass(&self) -> f64 {
        log_sum_exp(&self.log_pmf)
    }

    /// Log probability of surviving past the last tabulated score.
    pub fn log_tail_mass(&self) -> f64 {
        match (self.log_survival.last(), self.effective_average.last()) {
            (Some(log_s), Some(mu)) => log_s + log_ratio_to_successor(*mu),
            _ => 0.0,
        }
    }

    /// `ln(captured + tail)`; zero up to round-off.
    pub fn log_total_mass(&self) -> f64 {
        log_add_exp(self.log_captured_mass(), self.log_tail_mass())
    }
}

/// `mu1 + (mu0 - mu1) * exp(t)` for `t <= 0`, written as a convex
/// combination so a tiny `mu0` cannot cancel against `mu1` to zero.
///
/// One weight is at least one half, so the result is positive unless both
/// parameters are subnormal; the floor covers that case.
fn effective_average_at(mu0: f64, mu1: f64, t: f64) -> f64 {
    let w = t.exp();
    let complement = -t.exp_m1();
    (mu0 * w + mu1 * complement).max(f64::MIN_POSITIVE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(mu0: f64, mu1: f64, length: f64, horizon: usize) -> HazardCurve {
        HazardCurve::compute(HazardParams::new(mu0, mu1, length).unwrap(), horizon)
    }

    #[test]
    fn first_cells_match_closed_form() {
        let c = curve(10.0, 40.0, 5.0, 50);
        assert_eq!(c.horizon(), 50);
        assert_eq!(c.log_survival()[0], 0.0);
        assert!((c.effective_average()[0] - 10.0).abs() < 1e-12);
        assert!((c.log_pmf()[0] + 11.0f64.ln()).abs() < 1e-12);

        let mu_1 = 40.0 - 30.0 * (-0.2f64).exp();
        assert!((c.effective_average()[1] - mu_1).abs() < 1e-12);
        assert!((c.log_survival()[1] - (10.0f64 / 11.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn constant_ability_is_geometric() {
        // mu0 == mu1 gives a geometric distribution with mean mu.
        let c = curve(20.0, 20.0, 3.0, 2000);
        assert!((c.expected_average() - 20.0).abs() < 1e-6);
        assert!(c.log_tail_mass() < -40.0);
    }

    #[test]
    fn short_horizon_biases_average_down() {
        let long = curve(30.0, 30.0, 1.0, 2000);
        let short = curve(30.0, 30.0, 1.0, 50);
        assert!(short.expected_average() < long.expected_average());
        assert!(short.log_tail_mass() > -5.0);
    }

    #[test]
    fn mass_is_conserved() {
        for c in [curve(1.0, 100.0, 50.0, 300), curve(80.0, 2.0, 0.5, 300)] {
            assert!(c.log_total_mass().abs() < 1e-9, "{}", c.log_total_mass());
        }
    }

    #[test]
    fn tiny_initial_ability_with_huge_timescale_stays_finite() {
        let c = curve(1e-20, 100.0, 1e20, 10);
        assert!(c.effective_average().iter().all(|&mu| mu > 0.0));
        assert!((c.effective_average()[0] - 1e-20).abs() < 1e-32);
        assert!(c.log_survival().iter().all(|v| v.is_finite()));
        assert!(c.log_pmf().iter().all(|v| v.is_finite()));
        assert!(c.expected_average().is_finite());
        assert!(c.log_total_mass().abs() < 1e-9);
    }

    #[test]
    fn extreme_ratios_never_produce_nan() {
        for (mu0, mu1, length) in [
            (1e-300, 1e300, 1e300),
            (1e300, 1e-300, 1e-300),
            (f64::MIN_POSITIVE, f64::MIN_POSITIVE, 1.0),
            (5e-324, 5e-324, 1e-10),
        ] {
            let c = curve(mu0, mu1, length, 50);
            assert!(c.effective_average().iter().all(|&mu| mu > 0.0));
            assert!(c.log_survival().iter().all(|v| !v.is_nan()));
            assert!(c.log_pmf().iter().all(|v| !v.is_nan()));
            assert!(!c.expected_average().is_nan());
        }
    }

    #[test]
    fn survival_is_non_increasing() {
        let c = curve(3.0, 60.0, 20.0, 500);
        for pair in c.log_survival().windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }
}
