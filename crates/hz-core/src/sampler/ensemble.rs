use serde::Serialize;

use crate::model::{HazardCurve, HazardParams};

/// A curve and its cached log-likelihood.
///
/// The pair is only ever replaced as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    curve: HazardCurve,
    log_likelihood: f64,
}

impl Particle {
    pub fn new(curve: HazardCurve, log_likelihood: f64) -> Self {
        Self {
            curve,
            log_likelihood,
        }
    }

    pub fn curve(&self) -> &HazardCurve {
        &self.curve
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn summary(&self) -> ParticleSummary {
        ParticleSummary {
            params: self.curve.params(),
            expected_average: self.curve.expected_average(),
            log_likelihood: self.log_likelihood,
        }
    }
}

/// Serializable view of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleSummary {
    pub params: HazardParams,
    pub expected_average: f64,
    pub log_likelihood: f64,
}

/// Fixed-size set of particles.
#[derive(Debug, Clone)]
pub struct Ensemble {
    particles: Vec<Particle>,
}

impl Ensemble {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Swap in `particle` at `index`, returning the old occupant.
    pub(crate) fn replace(&mut self, index: usize, particle: Particle) -> Option<Particle> {
        self.particles
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, particle))
    }

    /// Particle with the highest log-likelihood; NaN never wins.
    pub fn best(&self) -> Option<&Particle> {
        self.particles
            .iter()
            .filter(|p| !p.log_likelihood.is_nan())
            .max_by(|a, b| a.log_likelihood.total_cmp(&b.log_likelihood))
    }
}
