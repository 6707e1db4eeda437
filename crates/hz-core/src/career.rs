//! Career text format and batting statistics.
//!
//! One innings per line: the runs scored, with a trailing `*` for a not-out.
//! Blank lines are skipped; anything else is an error.
//!
//! ```text
//! 45
//! 12*
//! 0
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker for an innings that ended without a dismissal.
pub const NOT_OUT_MARKER: char = '*';

/// Errors loading a career.
#[derive(Debug, Error)]
pub enum CareerError {
    #[error("line {line}: expected a non-negative score with optional '*', got {content:?}")]
    Malformed { line: usize, content: String },

    #[error("failed to read career file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single line that is not a valid innings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid innings {0:?}")]
pub struct ParseInningsError(pub String);

/// One innings: runs scored and whether it ended in a dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Innings {
    pub score: u64,
    pub dismissed: bool,
}

impl Innings {
    pub fn out(score: u64) -> Self {
        Self {
            score,
            dismissed: true,
        }
    }

    pub fn not_out(score: u64) -> Self {
        Self {
            score,
            dismissed: false,
        }
    }
}

impl FromStr for Innings {
    type Err = ParseInningsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (digits, dismissed) = match trimmed.strip_suffix(NOT_OUT_MARKER) {
            Some(rest) => (rest.trim_end(), false),
            None => (trimmed, true),
        };
        let score = digits
            .parse::<u64>()
            .map_err(|_| ParseInningsError(s.to_string()))?;
        Ok(Self { score, dismissed })
    }
}

impl fmt::Display for Innings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dismissed {
            write!(f, "{}", self.score)
        } else {
            write!(f, "{}{}", self.score, NOT_OUT_MARKER)
        }
    }
}

/// A batter's innings in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
    innings: Vec<Innings>,
}

impl Career {
    pub fn new(innings: Vec<Innings>) -> Self {
        Self { innings }
    }

    /// Parse the line format.
    pub fn parse(text: &str) -> Result<Self, CareerError> {
        let mut innings = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let parsed = line.parse::<Innings>().map_err(|_| CareerError::Malformed {
                line: idx + 1,
                content: line.to_string(),
            })?;
            innings.push(parsed);
        }
        Ok(Self { innings })
    }

    pub fn load(path: &Path) -> Result<Self, CareerError> {
        let text = std::fs::read_to_string(path).map_err(|source| CareerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn innings(&self) -> &[Innings] {
        &self.innings
    }

    pub fn len(&self) -> usize {
        self.innings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.innings.is_empty()
    }

    pub fn max_score(&self) -> Option<u64> {
        self.innings.iter().map(|i| i.score).max()
    }

    /// The line format accepted by [`Career::parse`].
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for innings in &self.innings {
            out.push_str(&innings.to_string());
            out.push('\n');
        }
        out
    }

    pub fn stats(&self) -> CareerStats {
        let dismissals = self.innings.iter().filter(|i| i.dismissed).count();
        let total_runs = self
            .innings
            .iter()
            .fold(0u64, |acc, i| acc.saturating_add(i.score));
        CareerStats {
            innings: self.innings.len(),
            dismissals,
            not_outs: self.innings.len() - dismissals,
            total_runs,
            highest_score: self.max_score(),
            batting_average: (dismissals > 0).then(|| total_runs as f64 / dismissals as f64),
        }
    }
}

impl FromStr for Career {
    type Err = CareerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Space separated, e.g. `45 12* 0`.
impl fmt::Display for Career {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, innings) in self.innings.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{innings}")?;
        }
        Ok(())
    }
}

impl FromIterator<Innings> for Career {
    fn from_iter<T: IntoIterator<Item = Innings>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Summary statistics of a career.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerStats {
    pub innings: usize,
    pub dismissals: usize,
    pub not_outs: usize,
    pub total_runs: u64,
    pub highest_score: Option<u64>,
    /// Runs per dismissal; `None` for a career without dismissals.
    pub batting_average: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scores_and_not_outs() {
        let career = Career::parse("45\n12*\n0\n").unwrap();
        assert_eq!(
            career.innings(),
            &[Innings::out(45), Innings::not_out(12), Innings::out(0)]
        );
        assert_eq!(career.to_string(), "45 12* 0");
    }

    #[test]
    fn skips_blank_lines_and_whitespace() {
        let career = Career::parse("\n  7 \n\n 3*\r\n\t\n").unwrap();
        assert_eq!(career.innings(), &[Innings::out(7), Innings::not_out(3)]);
    }

    #[test]
    fn reports_malformed_line_number() {
        let err = Career::parse("10\n\nabc\n5").unwrap_err();
        match err {
            CareerError::Malformed { line, content } => {
                assert_eq!(line, 3);
                assert_eq!(content, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scores_above_32_bits_parse() {
        let career = Career::parse("5000000000\n").unwrap();
        assert_eq!(career.innings(), &[Innings::out(5_000_000_000)]);
        assert_eq!(career.max_score(), Some(5_000_000_000));
    }

    #[test]
    fn rejects_negative_and_bare_marker() {
        for bad in ["-5", "*", "12**", "3.5", "1 2"] {
            assert!(Career::parse(bad).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn stats_follow_batting_conventions() {
        let career: Career = "50\n30*\n10\n".parse().unwrap();
        let stats = career.stats();
        assert_eq!(stats.innings, 3);
        assert_eq!(stats.dismissals, 2);
        assert_eq!(stats.not_outs, 1);
        assert_eq!(stats.total_runs, 90);
        assert_eq!(stats.highest_score, Some(50));
        assert_eq!(stats.batting_average, Some(45.0));
    }

    #[test]
    fn no_dismissals_has_no_average() {
        let career = Career::parse("5*\n8*").unwrap();
        assert_eq!(career.stats().batting_average, None);
        assert_eq!(Career::default().stats().highest_score, None);
    }
}
