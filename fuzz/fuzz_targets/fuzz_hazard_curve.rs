//! Fuzz target for curve tabulation and likelihood on arbitrary parameters.

#![no_main]

use arbitrary::Arbitrary;
use hz_core::career::Innings;
use hz_core::likelihood::log_likelihood;
use hz_core::model::{HazardCurve, HazardParams};
use hz_core::Career;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    mu0: f64,
    mu1: f64,
    length: f64,
    horizon: u16,
    innings: Vec<(u16, bool)>,
}

fuzz_target!(|input: Input| {
    let Ok(params) = HazardParams::new(input.mu0, input.mu1, input.length) else {
        return;
    };
    let curve = HazardCurve::compute(params, usize::from(input.horizon));
    assert!(curve.log_survival().iter().all(|v| !v.is_nan()));
    assert!(curve.log_pmf().iter().all(|v| !v.is_nan()));

    let career: Career = input
        .innings
        .iter()
        .map(|&(score, dismissed)| Innings {
            score: u64::from(score),
            dismissed,
        })
        .collect();
    if let Ok(value) = log_likelihood(&career, &curve) {
        assert!(!value.is_nan());
    }
});
