//! Hazard model: parameters, the derived hazard curve, and the prior.
//!
//! A [`HazardModel`] is the immutable configuration every curve and proposal
//! is built against: the score horizon, the prior strategy, and whether
//! `mu0 <= mu1` is enforced.

mod curve;
mod params;
mod prior;

pub use curve::HazardCurve;
pub use params::{HazardParams, Parameter};
pub use prior::Prior;

use hz_config::validate::validate_model;
use hz_config::{ModelConfig, PriorConfig, ValidationError};
use rand::Rng;
use thiserror::Error;

/// Errors building model values.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("parameter {name} must be positive and finite, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("invalid model configuration: {0}")]
    Config(#[from] ValidationError),
}

/// Immutable model configuration shared by curves, priors and proposals.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardModel {
    horizon: usize,
    prior: Prior,
    enforce_ordering: bool,
}

impl Default for HazardModel {
    fn default() -> Self {
        let config = ModelConfig::default();
        Self {
            horizon: config.horizon,
            prior: Prior::new(config.prior),
            enforce_ordering: config.enforce_ordering,
        }
    }
}

impl HazardModel {
    /// Build a model from a validated configuration section.
    pub fn new(config: &ModelConfig) -> Result<Self, ModelError> {
        validate_model(config)?;
        Ok(Self {
            horizon: config.horizon,
            prior: Prior::new(config.prior.clone()),
            enforce_ordering: config.enforce_ordering,
        })
    }

    /// Shorthand for a model with the given horizon and prior, no ordering.
    pub fn with_prior(horizon: usize, prior: PriorConfig) -> Result<Self, ModelError> {
        Self::new(&ModelConfig {
            horizon,
            prior,
            enforce_ordering: false,
        })
    }

    /// Turn the `mu0 <= mu1` constraint on or off.
    pub fn with_ordering(mut self, enforce: bool) -> Self {
        self.enforce_ordering = enforce;
        self
    }

    /// Score horizon `X_MAX`.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn prior(&self) -> &Prior {
        &self.prior
    }

    pub fn enforce_ordering(&self) -> bool {
        self.enforce_ordering
    }

    /// Tabulate the curve for `params` at this model's horizon.
    pub fn curve(&self, params: HazardParams) -> HazardCurve {
        HazardCurve::compute(params, self.horizon)
    }

    /// Apply the ordering constraint, if enabled.
    pub fn arrange(&self, params: HazardParams) -> HazardParams {
        if self.enforce_ordering {
            params.ordered()
        } else {
            params
        }
    }

    /// Draw parameters from the prior and tabulate their curve.
    pub fn sample_from_prior<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<HazardCurve, ModelError> {
        let params = self.arrange(self.prior.sample(rng)?);
        Ok(self.curve(params))
    }

    /// Log prior density over `(mu0, mu1, L)` in linear coordinates.
    ///
    /// Takes raw values because stretch moves can produce points with
    /// non-positive components; those get `-inf`.
    pub fn log_prior_values(&self, values: [f64; 3]) -> f64 {
        if self.enforce_ordering && values[0] > values[1] {
            return f64::NEG_INFINITY;
        }
        self.prior.log_density(values)
    }

    /// [`HazardModel::log_prior_values`] for validated parameters.
    pub fn log_prior(&self, params: &HazardParams) -> f64 {
        self.log_prior_values(params.as_array())
    }

    /// Log prior density of `(ln mu0, ln mu1, ln L)`.
    pub fn log_prior_log_coords(&self, params: &HazardParams) -> f64 {
        if self.enforce_ordering && params.mu0() > params.mu1() {
            return f64::NEG_INFINITY;
        }
        self.prior.log_density_log_coords(params.as_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hz_config::LogBounds;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn invalid_horizon_rejected() {
        let err = HazardModel::with_prior(1, PriorConfig::default()).unwrap_err();
        assert!(matches!(err, ModelError::Config(_)));
    }

    #[test]
    fn ordering_applies_to_prior_draws() {
        let model = HazardModel::default().with_ordering(true);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let curve = model.sample_from_prior(&mut rng).unwrap();
            assert!(curve.params().mu0() <= curve.params().mu1());
        }
    }

    #[test]
    fn ordering_zeroes_prior_of_inverted_points() {
        let model = HazardModel::default().with_ordering(true);
        assert_eq!(model.log_prior_values([50.0, 10.0, 5.0]), f64::NEG_INFINITY);
        assert!(model.log_prior_values([10.0, 50.0, 5.0]).is_finite());
    }

    #[test]
    fn prior_draws_stay_in_bounds() {
        let model = HazardModel::with_prior(
            100,
            PriorConfig::LogUniform {
                mu: LogBounds::new(2.0, 20.0),
                length: LogBounds::new(1.0, 10.0),
            },
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let params = model.sample_from_prior(&mut rng).unwrap().params();
            assert!(model.prior().in_support(&params), "{params}");
        }
    }
}
