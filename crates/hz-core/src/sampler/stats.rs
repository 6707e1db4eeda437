use serde::Serialize;

use super::ensemble::ParticleSummary;
use crate::proposal::MoveKind;

/// Counts for one move type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoveCounts {
    pub proposed: u64,
    pub accepted: u64,
    /// Proposals rejected for landing outside the prior's support.
    pub out_of_support: u64,
}

impl MoveCounts {
    pub fn acceptance_fraction(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }
}

/// Per-move-type tallies for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoveStats {
    pub single: MoveCounts,
    pub stretch: MoveCounts,
}

impl MoveStats {
    pub(crate) fn tally(&mut self, kind: MoveKind, accepted: bool, out_of_support: bool) {
        let counts = match kind {
            MoveKind::Single => &mut self.single,
            MoveKind::Stretch => &mut self.stretch,
        };
        counts.proposed += 1;
        counts.accepted += u64::from(accepted);
        counts.out_of_support += u64::from(out_of_support);
    }

    pub fn proposed(&self) -> u64 {
        self.single.proposed + self.stretch.proposed
    }

    pub fn accepted(&self) -> u64 {
        self.single.accepted + self.stretch.accepted
    }

    pub fn acceptance_fraction(&self) -> f64 {
        let proposed = self.proposed();
        if proposed == 0 {
            0.0
        } else {
            self.accepted() as f64 / proposed as f64
        }
    }
}

/// Outcome of a completed (or interrupted) run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub steps: u64,
    pub ensemble_size: usize,
    pub sampling_interval: u64,
    pub records_written: u64,
    pub moves: MoveStats,
    pub acceptance_fraction: f64,
    pub best: Option<ParticleSummary>,
    pub final_log_likelihoods: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_by_move_kind() {
        let mut stats = MoveStats::default();
        stats.tally(MoveKind::Single, true, false);
        stats.tally(MoveKind::Single, false, false);
        stats.tally(MoveKind::Stretch, false, true);
        stats.tally(MoveKind::Stretch, true, false);

        assert_eq!(stats.single.proposed, 2);
        assert_eq!(stats.single.accepted, 1);
        assert_eq!(stats.stretch.out_of_support, 1);
        assert_eq!(stats.proposed(), 4);
        assert_eq!(stats.acceptance_fraction(), 0.5);
        assert_eq!(MoveCounts::default().acceptance_fraction(), 0.0);
    }
}
