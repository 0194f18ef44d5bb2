//! Multi-start sweep over seeds.
//!
//! Each restart is an independent, sequential climb from the same start with
//! seed `base_seed + i`. Restarts run on the rayon pool; the winner is picked
//! after all runs finish, so the result does not depend on scheduling.

use rayon::prelude::*;
use tracing::{info, info_span};

use crate::domain::{CandidateParameters, ParamBounds, StepSizes};
use crate::error::AppError;
use crate::fit::{ClimbOptions, ClimbResult, Objective, RngMoves, hill_climb};

/// Result of one restart.
#[derive(Debug, Clone)]
pub struct RestartOutcome {
    pub seed: u64,
    pub result: ClimbResult,
}

/// All restarts plus the selected best.
#[derive(Debug, Clone)]
pub struct SweepResult {
    pub best: RestartOutcome,
    /// Every restart, in seed order.
    pub runs: Vec<RestartOutcome>,
}

/// Run `restarts` independent climbs and keep the lowest final score.
pub fn run_sweep(
    objective: &Objective,
    bounds: &ParamBounds,
    steps: &StepSizes,
    start: CandidateParameters,
    options: ClimbOptions,
    base_seed: u64,
    restarts: usize,
) -> Result<SweepResult, AppError> {
    if restarts == 0 {
        return Err(AppError::invalid_input("Restarts must be > 0."));
    }

    let runs: Vec<RestartOutcome> = (0..restarts)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i as u64);
            let span = info_span!("restart", seed);
            let result = span.in_scope(|| {
                hill_climb(
                    objective,
                    bounds,
                    steps,
                    start,
                    options,
                    &mut RngMoves::seeded(seed),
                )
            });
            RestartOutcome { seed, result }
        })
        .collect();

    // Deterministic selection: minimum score, ties go to the earlier restart.
    let mut best = &runs[0];
    for r in &runs[1..] {
        if r.result.score < best.result.score {
            best = r;
        }
    }

    if restarts > 1 {
        info!(
            seed = best.seed,
            score = best.result.score,
            restarts,
            "selected best restart"
        );
    }

    Ok(SweepResult {
        best: best.clone(),
        runs,
    })
}
