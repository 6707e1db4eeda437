//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::settings::{LogBounds, ModelConfig, PriorConfig, SamplerSettings, Settings};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a complete configuration semantically.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    if settings.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    validate_model(&settings.model)?;
    validate_sampler(&settings.sampler)?;
    Ok(())
}

/// Validate the hazard model section.
pub fn validate_model(model: &ModelConfig) -> ValidationResult<()> {
    // Two cells are the minimum for a survival step to exist.
    if model.horizon < 2 {
        return Err(ValidationError::InvalidValue {
            field: "model.horizon".to_string(),
            message: format!("Must be at least 2, got {}", model.horizon),
        });
    }

    validate_prior(&model.prior)
}

fn validate_prior(prior: &PriorConfig) -> ValidationResult<()> {
    validate_bounds("model.prior.mu", &prior.mu_bounds())?;
    validate_bounds("model.prior.length", &prior.length_bounds())?;

    if let PriorConfig::LogNormal {
        mu_log_mean,
        mu_log_sd,
        mu,
        ..
    } = prior
    {
        if !mu_log_mean.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: "model.prior.mu_log_mean".to_string(),
                message: format!("Must be finite, got {}", mu_log_mean),
            });
        }
        if !mu_log_sd.is_finite() || *mu_log_sd <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "model.prior.mu_log_sd".to_string(),
                message: format!("Must be positive and finite, got {}", mu_log_sd),
            });
        }
        if *mu_log_mean < mu.log_min() || *mu_log_mean > mu.log_max() {
            return Err(ValidationError::SemanticError(format!(
                "log-normal centre exp({}) = {} lies outside the mu bounds [{}, {}]",
                mu_log_mean,
                mu_log_mean.exp(),
                mu.min,
                mu.max
            )));
        }
    }

    Ok(())
}

fn validate_bounds(field: &str, bounds: &LogBounds) -> ValidationResult<()> {
    if !bounds.min.is_finite() || bounds.min <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.min", field),
            message: format!("Must be positive and finite, got {}", bounds.min),
        });
    }
    if !bounds.max.is_finite() || bounds.max <= bounds.min {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.max", field),
            message: format!("Must be finite and exceed min {}, got {}", bounds.min, bounds.max),
        });
    }
    Ok(())
}

/// Validate the sampler section.
pub fn validate_sampler(sampler: &SamplerSettings) -> ValidationResult<()> {
    if sampler.ensemble_size == 0 {
        return Err(ValidationError::InvalidValue {
            field: "sampler.ensemble_size".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }
    if sampler.steps == 0 {
        return Err(ValidationError::InvalidValue {
            field: "sampler.steps".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }
    if sampler.sampling_interval == 0 {
        return Err(ValidationError::InvalidValue {
            field: "sampler.sampling_interval".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }
    if !(0.0..=1.0).contains(&sampler.stretch_probability) {
        return Err(ValidationError::InvalidValue {
            field: "sampler.stretch_probability".to_string(),
            message: format!("Must be in [0, 1], got {}", sampler.stretch_probability),
        });
    }
    if sampler.flush_every == 0 {
        return Err(ValidationError::InvalidValue {
            field: "sampler.flush_every".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }
    Ok(())
}
