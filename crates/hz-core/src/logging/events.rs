//! Structured event vocabulary.
//!
//! Every event carries a stable `event` name and a [`Stage`]. Events emitted
//! inside a run span also carry its `run_id`.

use serde::{Deserialize, Serialize};

/// Stages of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading the career.
    Load,
    /// Ensemble initialization and MCMC steps.
    Sample,
    /// Summary output.
    Finish,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Sample => "sample",
            Stage::Finish => "finish",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";
    pub const RUN_FAILED: &str = "run.failed";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    // Input
    pub const CAREER_LOADED: &str = "career.loaded";
    pub const TRACE_OPENED: &str = "trace.opened";

    // Sampler
    pub const SAMPLER_STATE: &str = "sampler.state";
    pub const ENSEMBLE_INITIALIZED: &str = "ensemble.initialized";
    pub const SAMPLE_RECORDED: &str = "sample.recorded";
    pub const SAMPLER_FINISHED: &str = "sampler.finished";

    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Correlation identifiers for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    pub run_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
        }
    }

    /// Span that stamps `run_id` on every event inside it.
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("run", run_id = %self.run_id)
    }
}
