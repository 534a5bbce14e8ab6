//! Curated API surface for callers (CLI, benches, bindings).
//!
//! Prefer these re-exports over deep module paths; internal layout may move.

pub use crate::adjust::{adjust_trapezoid, AdjustCfg, Adjustment, Candidate, Reduction};
pub use crate::cfg::{DEFAULT_TOL, LABEL_TOL};
pub use crate::figure::{format_g, Figure, LabelRegistry, LineStyle, Role};
pub use crate::sampler::{draw_scenario, ReplayToken, SamplerCfg, SamplerError, ScenarioStream};
pub use crate::scenario::{Scenario, ScenarioError, ScenarioReport};
pub use crate::shape::{Quad, Trapezoid};

/// Run one scenario end to end; shorthand for `Scenario::evaluate`.
pub fn evaluate(scenario: &Scenario) -> Result<ScenarioReport, ScenarioError> {
    scenario.evaluate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn evaluate_matches_kernel() {
        let s = Scenario::default();
        let report = evaluate(&s).unwrap();
        let direct = adjust_trapezoid(&s.original(), s.candidate(), s.cfg());
        assert_eq!(report.adjustment, direct);
    }

    #[test]
    fn randomized_containment_seeded() {
        let mut rng = StdRng::seed_from_u64(42);
        let orig = Trapezoid::new(0.0, 120.0, 30.0, 90.0, 40.0);
        for _ in 0..100 {
            let cand = Candidate::new(
                rng.gen_range(-50.0..170.0),
                rng.gen_range(-50.0..170.0),
                rng.gen_range(-50.0..170.0),
                rng.gen_range(-50.0..170.0),
                None,
            );
            let out = adjust_trapezoid(&orig, cand, AdjustCfg::default());
            let a = out.adjusted;
            assert!(a.min >= 0.0 && a.max <= 120.0);
            assert!(a.low_bp <= 30.0);
            // Left side is slanted here, so high_bp always sits on max.
            assert_eq!(a.high_bp, a.max);
        }
    }
}
