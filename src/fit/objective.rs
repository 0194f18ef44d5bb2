//! Divergence score between the simplified and the reference formula.
//!
//! For each grid point and for each of `opt_time` / `max_time`:
//!
//! ```text
//! diff = ln(1 + simple) - ln(1 + original)
//! term = diff^2                       (symmetric)
//! term = diff^2 * factor  if diff < 0 (asymmetric, under-allocation)
//! ```
//!
//! The score is the mean of all terms (two per grid point).
//!
//! Reference allocations do not depend on the candidate, so they are computed
//! once when the objective is built.

use crate::domain::{
    CandidateParameters, OriginalConstants, PenaltyMode, SimpleConstants, TimeAllocation,
    TimeModelInput,
};
use crate::fit::InputGrid;
use crate::models::{original_time, simple_time};

/// Squared log error for one output, weighted per `mode`.
///
/// `diff` is `ln(1 + simple) - ln(1 + original)`.
pub fn penalized_term(diff: f64, mode: PenaltyMode, penalty_factor: f64) -> f64 {
    let sq = diff * diff;
    match mode {
        PenaltyMode::Asymmetric if diff < 0.0 => sq * penalty_factor,
        _ => sq,
    }
}

/// Pure scoring function over a fixed grid.
#[derive(Debug, Clone)]
pub struct Objective {
    inputs: Vec<TimeModelInput>,
    reference: Vec<TimeAllocation>,
    simple: SimpleConstants,
    mode: PenaltyMode,
    penalty_factor: f64,
}

impl Objective {
    pub fn new(
        grid: &InputGrid,
        original: &OriginalConstants,
        simple: SimpleConstants,
        mode: PenaltyMode,
        penalty_factor: f64,
    ) -> Self {
        let inputs: Vec<TimeModelInput> = grid.points().collect();
        let reference = inputs.iter().map(|i| original_time(original, i)).collect();
        Self {
            inputs,
            reference,
            simple,
            mode,
            penalty_factor,
        }
    }

    /// Number of accumulated terms (two per grid point).
    pub fn term_count(&self) -> usize {
        self.inputs.len() * 2
    }

    /// Mean penalized squared log error of `params`.
    pub fn score(&self, params: &CandidateParameters) -> f64 {
        let count = self.term_count();
        if count == 0 {
            return 0.0;
        }

        let mut error = 0.0;
        for (input, orig) in self.inputs.iter().zip(self.reference.iter()) {
            let simp = simple_time(params, &self.simple, input);

            let diff_opt = simp.opt_time.ln_1p() - orig.opt_time.ln_1p();
            let diff_max = simp.max_time.ln_1p() - orig.max_time.ln_1p();

            error += penalized_term(diff_opt, self.mode, self.penalty_factor);
            error += penalized_term(diff_max, self.mode, self.penalty_factor);
        }

        error / count as f64
    }
}
