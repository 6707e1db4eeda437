//! JSON payloads printed to stdout by the CLI.

use hz_config::ConfigSnapshot;
use serde::Serialize;

use crate::career::CareerStats;
use crate::sampler::RunSummary;

/// Output of `hz-core run`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub trace_path: String,
    pub prior_only: bool,
    pub career: CareerStats,
    pub config: ConfigSnapshot,
    pub summary: RunSummary,
}

/// Output of `hz-core check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub ok: bool,
    pub horizon: usize,
    pub config: ConfigSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career: Option<CareerStats>,
}
