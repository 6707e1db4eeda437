//! Top-level error type for CLI commands.

use thiserror::Error;

use crate::career::CareerError;
use crate::config::ConfigError;
use crate::exit_codes::ExitCode;
use crate::likelihood::LikelihoodError;
use crate::model::ModelError;
use crate::sampler::SamplerError;
use crate::trace::TraceError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Career(#[from] CareerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Likelihood(#[from] LikelihoodError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Sampler(#[from] SamplerError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Args(String),
}

impl CoreError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CoreError::Career(CareerError::Malformed { .. }) => ExitCode::InputError,
            CoreError::Career(CareerError::Io { .. }) => ExitCode::InputError,
            CoreError::Config(_) => ExitCode::ConfigError,
            CoreError::Likelihood(e) | CoreError::Sampler(SamplerError::Likelihood(e)) => {
                likelihood_exit_code(e)
            }
            CoreError::Model(ModelError::Config(_))
            | CoreError::Sampler(SamplerError::Config(_))
            | CoreError::Sampler(SamplerError::Model(ModelError::Config(_))) => {
                ExitCode::ConfigError
            }
            CoreError::Model(ModelError::InvalidParameter { .. })
            | CoreError::Sampler(SamplerError::Model(ModelError::InvalidParameter { .. }))
            | CoreError::Sampler(SamplerError::Finished { .. }) => ExitCode::InternalError,
            CoreError::Trace(_) | CoreError::Sampler(SamplerError::Trace(_)) => ExitCode::IoError,
            CoreError::Serialize(_) => ExitCode::InternalError,
            CoreError::Args(_) => ExitCode::ArgsError,
        }
    }
}

fn likelihood_exit_code(error: &LikelihoodError) -> ExitCode {
    match error {
        LikelihoodError::ScoreBeyondHorizon { .. } => ExitCode::HorizonError,
        LikelihoodError::HorizonMismatch { .. } => ExitCode::InternalError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_errors_are_distinct_from_bad_input() {
        let horizon: CoreError = LikelihoodError::ScoreBeyondHorizon {
            index: 0,
            score: 1200,
            horizon: 1000,
        }
        .into();
        let malformed: CoreError = CareerError::Malformed {
            line: 1,
            content: "x".to_string(),
        }
        .into();
        assert_eq!(horizon.exit_code(), ExitCode::HorizonError);
        assert_eq!(malformed.exit_code(), ExitCode::InputError);

        let wrapped: CoreError = SamplerError::Likelihood(LikelihoodError::ScoreBeyondHorizon {
            index: 0,
            score: 1200,
            horizon: 1000,
        })
        .into();
        assert_eq!(wrapped.exit_code(), ExitCode::HorizonError);
    }

    #[test]
    fn trace_failures_are_io() {
        let err: CoreError = TraceError::Io(std::io::Error::other("disk full")).into();
        assert_eq!(err.exit_code(), ExitCode::IoError);
    }
}
