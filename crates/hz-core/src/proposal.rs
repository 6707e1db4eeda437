//! Proposal moves over hazard-curve parameters.
//!
//! Two moves share one kernel:
//!
//! - **Single**: one parameter takes a heavy-tailed step in log space and is
//!   wrapped back into its bounds.
//! - **Stretch**: the affine-invariant ensemble move, interpolating or
//!   extrapolating along the line to another particle.
//!
//! Both return a fresh candidate curve; the current curve is never touched.

use std::fmt;

use hz_math::wrap_periodic;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::model::{HazardCurve, HazardModel, HazardParams, Parameter};

/// Largest step-size exponent: steps reach `10^1.5` bound widths.
const STEP_LOG10_MAX: f64 = 1.5;
/// Span of step-size exponents, down to `10^-4.5` bound widths.
const STEP_LOG10_SPAN: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Single,
    Stretch,
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveKind::Single => write!(f, "single"),
            MoveKind::Stretch => write!(f, "stretch"),
        }
    }
}

/// Outcome of a proposal.
#[derive(Debug, Clone, PartialEq)]
pub enum Proposal {
    /// A candidate inside the prior's support.
    Candidate {
        curve: HazardCurve,
        /// Log Hastings correction, including the prior ratio.
        log_hastings: f64,
    },
    /// The move landed where the prior has no mass; reject without
    /// evaluating anything.
    OutOfSupport,
}

impl Proposal {
    /// `-inf` for [`Proposal::OutOfSupport`].
    pub fn log_hastings(&self) -> f64 {
        match self {
            Proposal::Candidate { log_hastings, .. } => *log_hastings,
            Proposal::OutOfSupport => f64::NEG_INFINITY,
        }
    }

    pub fn curve(&self) -> Option<&HazardCurve> {
        match self {
            Proposal::Candidate { curve, .. } => Some(curve),
            Proposal::OutOfSupport => None,
        }
    }
}

/// Builds candidates for the sampler against a fixed model.
#[derive(Debug, Clone)]
pub struct ProposalKernel {
    model: HazardModel,
}

impl ProposalKernel {
    pub fn new(model: HazardModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &HazardModel {
        &self.model
    }

    /// Single-parameter move.
    ///
    /// Draws the parameter index, a step-size uniform, then a standard
    /// normal. The step is symmetric in log space, so the correction is the
    /// ratio of log-coordinate prior densities (zero for log-uniform).
    pub fn propose_single<R: Rng + ?Sized>(&self, current: &HazardCurve, rng: &mut R) -> Proposal {
        let param = Parameter::ALL[rng.random_range(0..Parameter::COUNT)];
        let bounds = self.model.prior().bounds(param);
        let scale = bounds.log_range();
        let step = scale * heavy_tailed_step(rng);

        let old = current.params();
        let log_value = wrap_periodic(old.get(param).ln() + step, bounds.log_min(), scale);
        let params = match old.with(param, log_value.exp()) {
            Ok(params) => self.model.arrange(params),
            Err(_) => return Proposal::OutOfSupport,
        };

        let log_prior_new = self.model.log_prior_log_coords(&params);
        if log_prior_new == f64::NEG_INFINITY {
            return Proposal::OutOfSupport;
        }
        let log_hastings = log_prior_new - self.model.log_prior_log_coords(&old);
        self.candidate(params, log_hastings)
    }

    /// Stretch move towards or away from `other`.
    ///
    /// Draws one uniform for `Z = (1 + U)^2 / 2`, so `Z` lies in `[1/2, 2]`
    /// with density proportional to `1 / sqrt(Z)`.
    pub fn propose_stretch<R: Rng + ?Sized>(
        &self,
        current: &HazardCurve,
        other: &HazardCurve,
        rng: &mut R,
    ) -> Proposal {
        let u: f64 = rng.random();
        let z = 0.5 * (1.0 + u).powi(2);

        let here = current.params().as_array();
        let there = other.params().as_array();
        let mut values = [0.0; Parameter::COUNT];
        for (value, (a, b)) in values.iter_mut().zip(here.into_iter().zip(there)) {
            *value = z * a + (1.0 - z) * b;
        }
        if self.model.enforce_ordering() && values[0] > values[1] {
            values.swap(0, 1);
        }

        let log_prior_new = self.model.log_prior_values(values);
        if log_prior_new == f64::NEG_INFINITY {
            return Proposal::OutOfSupport;
        }
        let params = match HazardParams::from_array(values) {
            Ok(params) => params,
            Err(_) => return Proposal::OutOfSupport,
        };

        let dimension = (Parameter::COUNT - 1) as f64;
        let log_hastings =
            dimension * z.ln() + log_prior_new - self.model.log_prior(&current.params());
        self.candidate(params, log_hastings)
    }

    fn candidate(&self, params: HazardParams, log_hastings: f64) -> Proposal {
        if log_hastings.is_nan() {
            return Proposal::OutOfSupport;
        }
        Proposal::Candidate {
            curve: self.model.curve(params),
            log_hastings,
        }
    }
}

/// `10^(1.5 - 6U) * N(0, 1)`: mostly small steps, occasionally huge ones.
fn heavy_tailed_step<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u: f64 = rng.random();
    let n: f64 = rng.sample(StandardNormal);
    10f64.powf(STEP_LOG10_MAX - STEP_LOG10_SPAN * u) * n
}
