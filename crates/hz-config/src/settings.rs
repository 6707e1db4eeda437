//! Model and sampler configuration types.
//!
//! Every section and field is optional in the JSON file; missing values take
//! the built-in defaults below.

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Relative slack applied at the edges of a bounded support.
///
/// Parameters produced by `exp(ln(x))` round trips can land one ulp outside
/// a bound that was given in linear space.
const SUPPORT_SLACK: f64 = 1e-12;

/// A closed positive interval `[min, max]`, used on a log scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogBounds {
    /// Lower bound, must be positive.
    pub min: f64,
    /// Upper bound, must exceed `min`.
    pub max: f64,
}

impl LogBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn log_min(&self) -> f64 {
        self.min.ln()
    }

    pub fn log_max(&self) -> f64 {
        self.max.ln()
    }

    /// Width of the interval in log space.
    pub fn log_range(&self) -> f64 {
        self.log_max() - self.log_min()
    }

    /// Whether `x` lies inside the interval (with round-off slack).
    pub fn contains(&self, x: f64) -> bool {
        x.is_finite() && x >= self.min * (1.0 - SUPPORT_SLACK) && x <= self.max * (1.0 + SUPPORT_SLACK)
    }
}

/// Prior family over the hazard-curve parameters.
///
/// `L` is always log-uniform on its bounds. The two families differ in the
/// prior over the abilities `mu0` and `mu1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum PriorConfig {
    /// Independent log-uniform priors on hard bounds (default).
    LogUniform {
        /// Bounds for `mu0` and `mu1`.
        mu: LogBounds,
        /// Bounds for the transition timescale `L`.
        length: LogBounds,
    },
    /// Independent log-normal priors on `mu0` and `mu1`, truncated to `mu`.
    LogNormal {
        /// Mean of `ln(mu)`.
        mu_log_mean: f64,
        /// Standard deviation of `ln(mu)`.
        mu_log_sd: f64,
        /// Truncation bounds for `mu0` and `mu1`; also the proposal wrap range.
        mu: LogBounds,
        /// Bounds for the transition timescale `L`.
        length: LogBounds,
    },
}

impl Default for PriorConfig {
    fn default() -> Self {
        PriorConfig::LogUniform {
            mu: LogBounds::new(1.0, 100.0),
            length: LogBounds::new(0.1, 100.0),
        }
    }
}

impl PriorConfig {
    /// Default settings for the log-normal family.
    pub fn log_normal_default() -> Self {
        PriorConfig::LogNormal {
            mu_log_mean: 25.0f64.ln(),
            mu_log_sd: 1.0,
            mu: LogBounds::new(1.0, 1000.0),
            length: LogBounds::new(0.1, 100.0),
        }
    }

    /// Bounds shared by `mu0` and `mu1`.
    pub fn mu_bounds(&self) -> LogBounds {
        match self {
            PriorConfig::LogUniform { mu, .. } | PriorConfig::LogNormal { mu, .. } => *mu,
        }
    }

    /// Bounds for `L`.
    pub fn length_bounds(&self) -> LogBounds {
        match self {
            PriorConfig::LogUniform { length, .. } | PriorConfig::LogNormal { length, .. } => {
                *length
            }
        }
    }

    /// Stable family name, as written in the `family` tag.
    pub fn family_name(&self) -> &'static str {
        match self {
            PriorConfig::LogUniform { .. } => "log_uniform",
            PriorConfig::LogNormal { .. } => "log_normal",
        }
    }
}

/// Hazard model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Score horizon `X_MAX`: curves are tabulated for scores `0..horizon`.
    ///
    /// Larger horizons shrink the truncation bias of the expected average at
    /// a linear cost per likelihood evaluation.
    pub horizon: usize,
    /// Prior family and its bounds.
    pub prior: PriorConfig,
    /// Keep `mu0 <= mu1` by swapping the two after every draw and move.
    pub enforce_ordering: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            horizon: 1000,
            prior: PriorConfig::default(),
            enforce_ordering: false,
        }
    }
}

/// MCMC driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    /// Number of particles in the ensemble.
    pub ensemble_size: usize,
    /// Total number of proposals (one likelihood evaluation each).
    pub steps: u64,
    /// Record one trace row every this many steps.
    pub sampling_interval: u64,
    /// Probability of choosing a stretch move over a single-parameter move.
    pub stretch_probability: f64,
    /// RNG seed. A fresh seed is drawn (and reported) when absent.
    pub seed: Option<u64>,
    /// Flush the trace sink every this many records.
    pub flush_every: usize,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            ensemble_size: 10,
            steps: 1_000_000,
            sampling_interval: 100,
            stretch_probability: 0.5,
            seed: None,
            flush_every: 1,
        }
    }
}

impl SamplerSettings {
    /// Number of trace rows a complete run writes: `ceil(steps / interval)`.
    pub fn expected_records(&self) -> u64 {
        if self.sampling_interval == 0 {
            return 0;
        }
        self.steps.div_ceil(self.sampling_interval)
    }
}

/// Complete configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Schema version of the file.
    pub schema_version: String,
    /// Hazard model section.
    pub model: ModelConfig,
    /// Sampler section.
    pub sampler: SamplerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            model: ModelConfig::default(),
            sampler: SamplerSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Pretty JSON rendering, as accepted by [`Settings::from_json`].
    pub fn to_json_pretty(&self) -> Result<String, ValidationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("Failed to serialize: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.model.horizon, 1000);
        assert!(!settings.model.enforce_ordering);
    }

    #[test]
    fn partial_sampler_section_keeps_other_defaults() {
        let settings = Settings::from_json(r#"{"sampler": {"steps": 500, "seed": 7}}"#).unwrap();
        assert_eq!(settings.sampler.steps, 500);
        assert_eq!(settings.sampler.seed, Some(7));
        assert_eq!(settings.sampler.sampling_interval, 100);
        assert_eq!(settings.sampler.ensemble_size, 10);
    }

    #[test]
    fn prior_family_tag_selects_variant() {
        let json = r#"{
            "model": {
                "prior": {
                    "family": "log_normal",
                    "mu_log_mean": 3.0,
                    "mu_log_sd": 0.5,
                    "mu": {"min": 1.0, "max": 500.0},
                    "length": {"min": 0.5, "max": 50.0}
                }
            }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.model.prior.family_name(), "log_normal");
        assert_eq!(settings.model.prior.mu_bounds(), LogBounds::new(1.0, 500.0));
        assert_eq!(settings.model.prior.length_bounds(), LogBounds::new(0.5, 50.0));
    }

    #[test]
    fn unknown_family_is_parse_error() {
        let json = r#"{"model": {"prior": {"family": "gamma"}}}"#;
        let err = Settings::from_json(json).unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn json_round_trip() {
        let mut settings = Settings::default();
        settings.model.prior = PriorConfig::log_normal_default();
        settings.sampler.seed = Some(42);
        let json = settings.to_json_pretty().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn log_bounds_contains_edges() {
        let bounds = LogBounds::new(1.0, 100.0);
        assert!(bounds.contains(1.0));
        assert!(bounds.contains(100.0));
        assert!(bounds.contains(bounds.log_max().exp()));
        assert!(!bounds.contains(0.5));
        assert!(!bounds.contains(100.5));
        assert!(!bounds.contains(f64::NAN));
        assert!((bounds.log_range() - 100.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn expected_records_rounds_up() {
        let mut sampler = SamplerSettings {
            steps: 1000,
            sampling_interval: 10,
            ..SamplerSettings::default()
        };
        assert_eq!(sampler.expected_records(), 100);
        sampler.steps = 1001;
        assert_eq!(sampler.expected_records(), 101);
    }
}
