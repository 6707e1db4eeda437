//! Structured logging for hz-core.
//!
//! Two output modes:
//! - Human-readable console output for interactive use
//! - JSON lines for scripted runs
//!
//! stdout is reserved for command payloads (the JSON run summary); all log
//! output goes to stderr. Events emitted during a run are nested in a span
//! carrying the run's `run_id`.
//!
//! ```ignore
//! use hz_core::logging::{init_logging, LogConfig, LogContext, Stage, event_names};
//!
//! init_logging(&LogConfig::from_env(None, None));
//! let ctx = LogContext::new(generate_run_id());
//! let _span = ctx.span().entered();
//! hz_core::log_event!(INFO, event_names::RUN_STARTED, Stage::Init, "starting run");
//! ```

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, LogContext, Stage};

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// The level comes from `config` alone; `RUST_LOG` has already been folded
/// into it by [`LogConfig::from_env`]. A second call is a no-op.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::new(filter_directives(config.level));

    let installed = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
        }
    };

    if installed.is_err() {
        tracing::debug!("logging already initialized");
    }
}

/// Per-crate directives for the workspace crates at `level`.
fn filter_directives(level: LogLevel) -> String {
    let level = LevelFilter::from(level);
    format!("hz_core={level},hz_config={level}")
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    // First 12 hex chars are plenty to tell runs apart.
    format!("run-{}", &uuid.simple().to_string()[..12])
}

/// Emit a structured event with a stable name and stage.
///
/// ```ignore
/// log_event!(INFO, event_names::CAREER_LOADED, Stage::Load, "career loaded",
///     innings = 120, not_outs = 14);
/// ```
#[macro_export]
macro_rules! log_event {
    (INFO, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::info!(event = $event, stage = %$stage, $($key = $val,)* "{}", $msg)
    };
    (DEBUG, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::debug!(event = $event, stage = %$stage, $($key = $val,)* "{}", $msg)
    };
    (WARN, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::warn!(event = $event, stage = %$stage, $($key = $val,)* "{}", $msg)
    };
    (ERROR, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::error!(event = $event, stage = %$stage, $($key = $val,)* "{}", $msg)
    };
}
