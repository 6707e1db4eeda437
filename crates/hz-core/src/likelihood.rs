//! Log-likelihood of a career under a hazard curve.
//!
//! Innings are independent: a dismissal on `x` contributes `ln P(x)`, a
//! not-out on `x` contributes `ln P(score >= x)`.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::career::Career;
use crate::model::HazardCurve;

#[derive(Debug, Error)]
pub enum LikelihoodError {
    #[error(
        "innings {index} scored {score}, beyond the model horizon of {horizon}; \
         raise model.horizon above the highest score"
    )]
    ScoreBeyondHorizon {
        index: usize,
        score: u64,
        horizon: usize,
    },

    #[error("curve horizon {curve} does not match evaluator horizon {evaluator}")]
    HorizonMismatch { curve: usize, evaluator: usize },
}

/// Sum the per-innings terms directly.
pub fn log_likelihood(career: &Career, curve: &HazardCurve) -> Result<f64, LikelihoodError> {
    let horizon = curve.horizon();
    let mut total = 0.0;
    for (index, innings) in career.innings().iter().enumerate() {
        let cell = score_cell(index, innings.score, horizon)?;
        total += if innings.dismissed {
            curve.log_pmf()[cell]
        } else {
            curve.log_survival()[cell]
        };
    }
    Ok(total)
}

fn score_cell(index: usize, score: u64, horizon: usize) -> Result<usize, LikelihoodError> {
    match usize::try_from(score) {
        Ok(cell) if cell < horizon => Ok(cell),
        _ => Err(LikelihoodError::ScoreBeyondHorizon {
            index,
            score,
            horizon,
        }),
    }
}

/// A career checked against a horizon and folded into score counts.
///
/// Evaluation touches each distinct `(score, dismissed)` pair once.
#[derive(Debug, Clone)]
pub struct LikelihoodEvaluator {
    horizon: usize,
    innings: usize,
    dismissed: Vec<(usize, f64)>,
    not_out: Vec<(usize, f64)>,
}

impl LikelihoodEvaluator {
    /// Fails on the first innings at or beyond `horizon`.
    pub fn new(career: &Career, horizon: usize) -> Result<Self, LikelihoodError> {
        let mut dismissed: BTreeMap<usize, u32> = BTreeMap::new();
        let mut not_out: BTreeMap<usize, u32> = BTreeMap::new();

        for (index, innings) in career.innings().iter().enumerate() {
            let cell = score_cell(index, innings.score, horizon)?;
            let counts = if innings.dismissed {
                &mut dismissed
            } else {
                &mut not_out
            };
            *counts.entry(cell).or_default() += 1;
        }

        let weights = |counts: BTreeMap<usize, u32>| -> Vec<(usize, f64)> {
            counts
                .into_iter()
                .map(|(cell, n)| (cell, f64::from(n)))
                .collect()
        };

        Ok(Self {
            horizon,
            innings: career.len(),
            dismissed: weights(dismissed),
            not_out: weights(not_out),
        })
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Number of innings folded in.
    pub fn innings(&self) -> usize {
        self.innings
    }

    pub fn evaluate(&self, curve: &HazardCurve) -> Result<f64, LikelihoodError> {
        if curve.horizon() != self.horizon {
            return Err(LikelihoodError::HorizonMismatch {
                curve: curve.horizon(),
                evaluator: self.horizon,
            });
        }
        let log_pmf = curve.log_pmf();
        let log_survival = curve.log_survival();

        let dismissed: f64 = self.dismissed.iter().map(|&(x, n)| n * log_pmf[x]).sum();
        let not_out: f64 = self.not_out.iter().map(|&(x, n)| n * log_survival[x]).sum();
        Ok(dismissed + not_out)
    }
}
