//! Career hazard inference engine.
//!
//! Fits a three-parameter hazard model of a batter's innings by ensemble
//! MCMC:
//! - [`model`]: parameters, the tabulated [`model::HazardCurve`], and the prior
//! - [`likelihood`]: log-likelihood of a [`career::Career`] under a curve
//! - [`proposal`]: single-parameter and stretch moves
//! - [`sampler`]: the Metropolis-Hastings driver and run statistics
//! - [`trace`]: the append-only sample trace

pub mod career;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod likelihood;
pub mod logging;
pub mod model;
pub mod proposal;
pub mod report;
pub mod sampler;
pub mod trace;

pub use career::{Career, CareerError, Innings};
pub use likelihood::{LikelihoodError, LikelihoodEvaluator};
pub use model::{HazardCurve, HazardModel, HazardParams};
pub use proposal::{MoveKind, Proposal, ProposalKernel};
pub use sampler::{RunSummary, Sampler, SamplerError, SamplerState};
pub use trace::{MemoryTrace, TraceRecord, TraceSink, TraceWriter};
