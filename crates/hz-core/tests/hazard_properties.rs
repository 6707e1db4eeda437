//! Property-based tests for hazard curve, likelihood and proposal invariants.

use hz_config::PriorConfig;
use hz_core::career::{Career, Innings};
use hz_core::likelihood::{log_likelihood, LikelihoodEvaluator};
use hz_core::model::{HazardCurve, HazardModel, HazardParams};
use hz_core::proposal::{Proposal, ProposalKernel};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const HORIZON: usize = 300;

fn params_strategy() -> impl Strategy<Value = HazardParams> {
    (-3.0f64..7.0, -3.0f64..7.0, -4.0f64..6.0).prop_map(|(a, b, c)| {
        HazardParams::new(a.exp(), b.exp(), c.exp()).expect("positive parameters")
    })
}

/// Extreme ratios between the abilities and very long or short timescales.
fn wide_params_strategy() -> impl Strategy<Value = HazardParams> {
    (-50.0f64..50.0, -50.0f64..50.0, -20.0f64..50.0).prop_map(|(a, b, c)| {
        HazardParams::new(a.exp(), b.exp(), c.exp()).expect("positive parameters")
    })
}

fn in_bounds_params() -> impl Strategy<Value = HazardParams> {
    // Inside the default prior box: mu in [1, 100], L in [0.1, 100].
    (0.0f64..4.6, 0.0f64..4.6, -2.3f64..4.6).prop_map(|(a, b, c)| {
        HazardParams::new(a.exp(), b.exp(), c.exp()).expect("positive parameters")
    })
}

fn innings_strategy() -> impl Strategy<Value = Innings> {
    (0u64..(HORIZON as u64), any::<bool>()).prop_map(|(score, dismissed)| Innings { score, dismissed })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn survival_is_non_increasing_and_finite(params in wide_params_strategy()) {
        let curve = HazardCurve::compute(params, HORIZON);
        prop_assert_eq!(curve.log_survival()[0], 0.0);
        for pair in curve.log_survival().windows(2) {
            prop_assert!(pair[1] <= pair[0]);
        }
        for (&s, &f) in curve.log_survival().iter().zip(curve.log_pmf()) {
            prop_assert!(!s.is_nan() && !f.is_nan());
            prop_assert!(s <= 0.0 && f <= 0.0);
        }
        prop_assert!(curve.expected_average().is_finite());
        prop_assert!(curve.expected_average() >= 0.0);
    }

    #[test]
    fn probability_mass_is_conserved(params in wide_params_strategy()) {
        let curve = HazardCurve::compute(params, HORIZON);
        let mut cumulative = 0.0;
        for x in 0..HORIZON {
            let total = curve.log_survival()[x].exp() + cumulative;
            prop_assert!((total - 1.0).abs() < 1e-9, "x={x} total={total}");
            cumulative += curve.log_pmf()[x].exp();
        }
        prop_assert!(curve.log_total_mass().abs() < 1e-9);
    }

    #[test]
    fn likelihood_ignores_innings_order(
        innings in prop::collection::vec(innings_strategy(), 0..40),
        params in params_strategy(),
        seed in any::<u64>(),
    ) {
        let curve = HazardCurve::compute(params, HORIZON);
        let forward = Career::new(innings.clone());

        let mut shuffled = innings;
        let mut rng = StdRng::seed_from_u64(seed);
        rand::seq::SliceRandom::shuffle(shuffled.as_mut_slice(), &mut rng);
        let shuffled = Career::new(shuffled);

        let a = log_likelihood(&forward, &curve).unwrap();
        let b = log_likelihood(&shuffled, &curve).unwrap();
        prop_assert!((a - b).abs() <= 1e-9 * a.abs().max(1.0));

        let evaluator = LikelihoodEvaluator::new(&shuffled, HORIZON).unwrap();
        let c = evaluator.evaluate(&curve).unwrap();
        prop_assert!((a - c).abs() <= 1e-9 * a.abs().max(1.0));
    }

    #[test]
    fn proposals_stay_positive_and_finite(
        here in in_bounds_params(),
        there in in_bounds_params(),
        seed in any::<u64>(),
    ) {
        let model = HazardModel::with_prior(HORIZON, PriorConfig::default()).unwrap();
        let kernel = ProposalKernel::new(model);
        let a = kernel.model().curve(here);
        let b = kernel.model().curve(there);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..20 {
            for proposal in [
                kernel.propose_single(&a, &mut rng),
                kernel.propose_stretch(&a, &b, &mut rng),
            ] {
                match proposal {
                    Proposal::Candidate { curve, log_hastings } => {
                        let p = curve.params();
                        prop_assert!(p.mu0() > 0.0 && p.mu1() > 0.0 && p.length() > 0.0);
                        prop_assert!(kernel.model().prior().in_support(&p));
                        prop_assert!(log_hastings.is_finite());
                        prop_assert!(curve.log_pmf().iter().all(|v| !v.is_nan()));
                    }
                    Proposal::OutOfSupport => {}
                }
            }
        }
    }

    #[test]
    fn career_text_round_trips(innings in prop::collection::vec(innings_strategy(), 0..30)) {
        let career = Career::new(innings);
        let reparsed = Career::parse(&career.to_text()).unwrap();
        prop_assert_eq!(reparsed, career);
    }
}
