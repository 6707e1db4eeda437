use hz_config::{LogBounds, PriorConfig};
use hz_math::{lognormal_log_pdf, normal_log_pdf};
use rand::Rng;
use rand_distr::{Distribution, LogNormal};

use super::{HazardParams, ModelError, Parameter};

/// Rejection attempts for a truncated log-normal draw before falling back to
/// a log-uniform draw on the same bounds.
const MAX_REJECTION_ATTEMPTS: usize = 1000;

/// Prior over `(mu0, mu1, L)`, selected by configuration.
///
/// Densities are unnormalized where the normalizer is constant (the
/// truncation mass of the log-normal); ratios between points are exact.
#[derive(Debug, Clone, PartialEq)]
pub struct Prior {
    config: PriorConfig,
}

impl Prior {
    pub fn new(config: PriorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PriorConfig {
        &self.config
    }

    /// Support bounds of one parameter; also its proposal wrap range.
    pub fn bounds(&self, param: Parameter) -> LogBounds {
        match param {
            Parameter::Mu0 | Parameter::Mu1 => self.config.mu_bounds(),
            Parameter::Length => self.config.length_bounds(),
        }
    }

    pub fn in_support(&self, params: &HazardParams) -> bool {
        self.values_in_support(params.as_array())
    }

    fn values_in_support(&self, values: [f64; 3]) -> bool {
        Parameter::ALL
            .into_iter()
            .zip(values)
            .all(|(param, value)| self.bounds(param).contains(value))
    }

    /// Log density with respect to `d mu0 d mu1 dL`; `-inf` off the support.
    pub fn log_density(&self, values: [f64; 3]) -> f64 {
        if !self.values_in_support(values) {
            return f64::NEG_INFINITY;
        }
        let [mu0, mu1, length] = values;
        let log_length = -length.ln() - self.config.length_bounds().log_range().ln();

        match &self.config {
            PriorConfig::LogUniform { mu, .. } => {
                let log_norm = mu.log_range().ln();
                -mu0.ln() - mu1.ln() - 2.0 * log_norm + log_length
            }
            PriorConfig::LogNormal {
                mu_log_mean,
                mu_log_sd,
                ..
            } => {
                lognormal_log_pdf(mu0, *mu_log_mean, *mu_log_sd)
                    + lognormal_log_pdf(mu1, *mu_log_mean, *mu_log_sd)
                    + log_length
            }
        }
    }

    /// Log density of `(ln mu0, ln mu1, ln L)`; `-inf` off the support.
    ///
    /// Constant on the support for the log-uniform family, so a move that is
    /// symmetric in log space needs no correction there.
    pub fn log_density_log_coords(&self, values: [f64; 3]) -> f64 {
        if !self.values_in_support(values) {
            return f64::NEG_INFINITY;
        }
        let [mu0, mu1, _] = values;
        let log_length = -self.config.length_bounds().log_range().ln();

        match &self.config {
            PriorConfig::LogUniform { mu, .. } => -2.0 * mu.log_range().ln() + log_length,
            PriorConfig::LogNormal {
                mu_log_mean,
                mu_log_sd,
                ..
            } => {
                normal_log_pdf(mu0.ln(), *mu_log_mean, *mu_log_sd)
                    + normal_log_pdf(mu1.ln(), *mu_log_mean, *mu_log_sd)
                    + log_length
            }
        }
    }

    /// Draw `mu0`, `mu1`, then `L`.
    ///
    /// Fails only for bounds that validation would have rejected.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<HazardParams, ModelError> {
        let mu_bounds = self.config.mu_bounds();
        let (mu0, mu1) = match &self.config {
            PriorConfig::LogUniform { .. } => (
                draw_log_uniform(rng, mu_bounds),
                draw_log_uniform(rng, mu_bounds),
            ),
            PriorConfig::LogNormal {
                mu_log_mean,
                mu_log_sd,
                ..
            } => (
                draw_truncated_lognormal(rng, *mu_log_mean, *mu_log_sd, mu_bounds),
                draw_truncated_lognormal(rng, *mu_log_mean, *mu_log_sd, mu_bounds),
            ),
        };
        let length = draw_log_uniform(rng, self.config.length_bounds());

        HazardParams::new(mu0, mu1, length)
    }
}

fn draw_log_uniform<R: Rng + ?Sized>(rng: &mut R, bounds: LogBounds) -> f64 {
    let u: f64 = rng.random();
    (bounds.log_min() + bounds.log_range() * u).exp()
}

fn draw_truncated_lognormal<R: Rng + ?Sized>(
    rng: &mut R,
    log_mean: f64,
    log_sd: f64,
    bounds: LogBounds,
) -> f64 {
    if let Ok(dist) = LogNormal::new(log_mean, log_sd) {
        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let x = dist.sample(rng);
            if bounds.contains(x) {
                return x;
            }
        }
    }
    draw_log_uniform(rng, bounds)
}
