//! Career files on disk.

use hz_core::career::{Career, CareerError, Innings};
use hz_core::likelihood::{LikelihoodError, LikelihoodEvaluator};
use std::fs;
use tempfile::TempDir;

#[test]
fn load_reads_scores_and_flags() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("career.txt");
    fs::write(&path, "45\n12*\n0\n").expect("write career");

    let career = Career::load(&path).expect("load career");
    let scores: Vec<u64> = career.innings().iter().map(|i| i.score).collect();
    let flags: Vec<bool> = career.innings().iter().map(|i| i.dismissed).collect();
    assert_eq!(scores, vec![45, 12, 0]);
    assert_eq!(flags, vec![true, false, true]);
    assert_eq!(career.to_string(), "45 12* 0");
    assert_eq!(career.to_text(), "45\n12*\n0\n");
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = Career::load(&dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, CareerError::Io { .. }));
    assert!(err.to_string().contains("absent.txt"));
}

#[test]
fn malformed_line_fails_fast() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("career.txt");
    fs::write(&path, "12\n7*\nDNB\n30\n").expect("write career");

    match Career::load(&path).unwrap_err() {
        CareerError::Malformed { line, content } => {
            assert_eq!(line, 3);
            assert_eq!(content, "DNB");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn long_innings_need_a_long_horizon() {
    let career: Career = [Innings::out(12), Innings::not_out(1200), Innings::out(3)]
        .into_iter()
        .collect();

    let err = LikelihoodEvaluator::new(&career, 1000).unwrap_err();
    assert!(matches!(
        err,
        LikelihoodError::ScoreBeyondHorizon {
            index: 1,
            score: 1200,
            horizon: 1000
        }
    ));
    assert!(err.to_string().contains("horizon"));
    assert!(LikelihoodEvaluator::new(&career, 1201).is_ok());
}
