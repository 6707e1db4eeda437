//! Ensemble Metropolis-Hastings driver.
//!
//! The sampler owns a fixed-size ensemble of particles. Each step picks one
//! particle, proposes a single-parameter or stretch move for it, evaluates
//! the candidate, and replaces the particle on acceptance. Every
//! `sampling_interval` steps the picked particle is recorded (before its
//! update) to a [`TraceSink`].
//!
//! Random draws come from one seeded [`StdRng`] in a fixed order per step:
//! particle index, move-type uniform, the move's own draws, and finally the
//! acceptance uniform when there is a candidate to test.

mod acceptance;
mod ensemble;
mod stats;

pub use acceptance::{log_acceptance, metropolis_accept};
pub use ensemble::{Ensemble, Particle, ParticleSummary};
pub use stats::{MoveCounts, MoveStats, RunSummary};

use hz_config::validate::validate_sampler;
use hz_config::{SamplerSettings, ValidationError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

use crate::likelihood::{LikelihoodError, LikelihoodEvaluator};
use crate::logging::{event_names, Stage};
use crate::model::ModelError;
use crate::proposal::{MoveKind, Proposal, ProposalKernel};
use crate::trace::{TraceError, TraceRecord, TraceSink};

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error(transparent)]
    Likelihood(#[from] LikelihoodError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("invalid sampler settings: {0}")]
    Config(#[from] ValidationError),

    #[error("sampler already finished after {steps} steps")]
    Finished { steps: u64 },
}

/// Lifecycle of a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerState {
    /// Drawing the ensemble from the prior.
    Initializing,
    /// Accepting steps.
    Running,
    /// All steps taken; particles are frozen.
    Finished,
}

/// What happened in one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub step: u64,
    pub particle: usize,
    pub kind: MoveKind,
    pub log_acceptance: f64,
    pub accepted: bool,
    pub recorded: bool,
}

pub struct Sampler {
    kernel: ProposalKernel,
    evaluator: LikelihoodEvaluator,
    settings: SamplerSettings,
    ensemble: Ensemble,
    rng: StdRng,
    seed: u64,
    step: u64,
    state: SamplerState,
    stats: MoveStats,
    records: u64,
}

impl Sampler {
    /// Validate settings, seed the RNG and draw the ensemble from the prior.
    pub fn new(
        kernel: ProposalKernel,
        evaluator: LikelihoodEvaluator,
        settings: SamplerSettings,
    ) -> Result<Self, SamplerError> {
        validate_sampler(&settings)?;
        let horizon = kernel.model().horizon();
        if evaluator.horizon() != horizon {
            return Err(LikelihoodError::HorizonMismatch {
                curve: horizon,
                evaluator: evaluator.horizon(),
            }
            .into());
        }

        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);

        let mut state = SamplerState::Initializing;
        tracing::debug!(event = event_names::SAMPLER_STATE, stage = %Stage::Sample, state = ?state, seed);

        let mut particles = Vec::with_capacity(settings.ensemble_size);
        for _ in 0..settings.ensemble_size {
            let curve = kernel.model().sample_from_prior(&mut rng)?;
            let log_likelihood = evaluator.evaluate(&curve)?;
            particles.push(Particle::new(curve, log_likelihood));
        }
        let ensemble = Ensemble::new(particles);

        tracing::info!(
            event = event_names::ENSEMBLE_INITIALIZED,
            stage = %Stage::Sample,
            seed,
            ensemble_size = ensemble.len(),
            innings = evaluator.innings(),
            best_log_likelihood = ensemble.best().map(Particle::log_likelihood),
            "ensemble drawn from prior"
        );

        state = SamplerState::Running;
        Ok(Self {
            kernel,
            evaluator,
            settings,
            ensemble,
            rng,
            seed,
            step: 0,
            state,
            stats: MoveStats::default(),
            records: 0,
        })
    }

    /// Seed actually used, whether configured or drawn.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Number of steps taken so far.
    pub fn steps_taken(&self) -> u64 {
        self.step
    }

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    pub fn stats(&self) -> &MoveStats {
        &self.stats
    }

    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Take one step.
    pub fn step<S: TraceSink + ?Sized>(&mut self, sink: &mut S) -> Result<StepOutcome, SamplerError> {
        if self.state == SamplerState::Finished {
            return Err(SamplerError::Finished { steps: self.step });
        }

        let size = self.ensemble.len();
        let which = self.rng.random_range(0..size);
        let current = &self.ensemble.particles()[which];
        let current_ll = current.log_likelihood();

        let recorded = self.step % self.settings.sampling_interval == 0;
        if recorded {
            sink.record(&TraceRecord::new(self.step, which, current.curve(), current_ll))?;
            self.records += 1;
            tracing::debug!(
                event = event_names::SAMPLE_RECORDED,
                stage = %Stage::Sample,
                step = self.step,
                particle = which,
                params = %current.curve().params(),
                log_likelihood = current_ll,
                acceptance_fraction = self.stats.acceptance_fraction(),
            );
        }

        let move_u: f64 = self.rng.random();
        let kind = if size > 1 && move_u < self.settings.stretch_probability {
            MoveKind::Stretch
        } else {
            MoveKind::Single
        };

        let proposal = match kind {
            MoveKind::Single => self.kernel.propose_single(current.curve(), &mut self.rng),
            MoveKind::Stretch => {
                let partner = pick_partner(&mut self.rng, size, which);
                let other = &self.ensemble.particles()[partner];
                self.kernel
                    .propose_stretch(current.curve(), other.curve(), &mut self.rng)
            }
        };

        let (accepted, log_a, out_of_support) = match proposal {
            Proposal::OutOfSupport => (false, f64::NEG_INFINITY, true),
            Proposal::Candidate {
                curve,
                log_hastings,
            } => {
                let candidate_ll = self.evaluator.evaluate(&curve)?;
                let log_a = log_acceptance(candidate_ll, current_ll, log_hastings);
                let u: f64 = self.rng.random();
                let accepted = metropolis_accept(log_a, u);
                if accepted {
                    self.ensemble
                        .replace(which, Particle::new(curve, candidate_ll));
                }
                (accepted, log_a, false)
            }
        };

        self.stats.tally(kind, accepted, out_of_support);
        let outcome = StepOutcome {
            step: self.step,
            particle: which,
            kind,
            log_acceptance: log_a,
            accepted,
            recorded,
        };

        self.step += 1;
        if self.step >= self.settings.steps {
            self.finish(sink)?;
        }
        Ok(outcome)
    }

    /// Step until finished, then summarize.
    pub fn run<S: TraceSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunSummary, SamplerError> {
        while self.state != SamplerState::Finished {
            self.step(sink)?;
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            steps: self.step,
            ensemble_size: self.ensemble.len(),
            sampling_interval: self.settings.sampling_interval,
            records_written: self.records,
            moves: self.stats,
            acceptance_fraction: self.stats.acceptance_fraction(),
            best: self.ensemble.best().map(Particle::summary),
            final_log_likelihoods: self
                .ensemble
                .particles()
                .iter()
                .map(Particle::log_likelihood)
                .collect(),
        }
    }

    fn finish<S: TraceSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), SamplerError> {
        sink.flush()?;
        self.state = SamplerState::Finished;
        tracing::info!(
            event = event_names::SAMPLER_FINISHED,
            stage = %Stage::Sample,
            steps = self.step,
            records = self.records,
            acceptance_fraction = self.stats.acceptance_fraction(),
            single_accepted = self.stats.single.accepted,
            stretch_accepted = self.stats.stretch.accepted,
            "sampling finished"
        );
        Ok(())
    }
}

/// Uniform over `0..size` excluding `current`, with a single draw.
fn pick_partner<R: Rng + ?Sized>(rng: &mut R, size: usize, current: usize) -> usize {
    let k = rng.random_range(0..size - 1);
    if k >= current {
        k + 1
    } else {
        k
    }
}
