//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the fitting code stays free of printing
//! - output changes are localized (and covered by snapshot tests below)

use crate::domain::{CandidateParameters, PARAM_NAMES, TuneConfig, VerificationSpec};
use crate::fit::SweepResult;
use crate::report::VerificationRow;

/// First line of a tune run.
pub fn format_initial(score: f64) -> String {
    format!("Initial Error: {score}")
}

/// Final score, parameters and (for sweeps) the per-restart scores.
pub fn format_tune_summary(sweep: &SweepResult, config: &TuneConfig) -> String {
    let best = &sweep.best.result;
    let mut out = String::new();

    out.push_str("Optimization result:\n");
    out.push_str(&format!("Error: {}\n", best.score));
    out.push_str(&format!(
        "Penalty: {} (factor {}) | iterations={} | accepted={} | seed={}\n",
        config.penalty.display_name(),
        config.penalty_factor,
        best.iterations,
        best.accepted,
        sweep.best.seed,
    ));

    if sweep.runs.len() > 1 {
        out.push_str("\nRestarts:\n");
        for run in &sweep.runs {
            let chosen = if run.seed == sweep.best.seed { "*" } else { " " };
            out.push_str(&format!(
                "{chosen} seed={:<8} error={:.6} accepted={}\n",
                run.seed, run.result.score, run.result.accepted
            ));
        }
    }

    out.push_str("\nParams:\n");
    out.push_str(&format_params(&best.params));
    out
}

/// One `name = value` line per coordinate, 5 decimals.
pub fn format_params(params: &CandidateParameters) -> String {
    let mut out = String::new();
    for (name, value) in PARAM_NAMES.iter().zip(params.to_array()) {
        out.push_str(&format!("{name} = {value:.5}\n"));
    }
    out
}

/// Fixed-width comparison table of both formulas.
pub fn format_verification_table(rows: &[VerificationRow], spec: &VerificationSpec) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Verification (Time={}s, Inc={}ms):\n",
        spec.time_ms / 1000.0,
        spec.increment_ms
    ));
    out.push_str(&format!(
        "{:<5} {:<10} {:<10} {:<10} {:<10}\n",
        "Ply", "Orig Opt", "Simp Opt", "Orig Max", "Simp Max"
    ));
    for r in rows {
        out.push_str(&format!(
            "{:<5} {:<10.1} {:<10.1} {:<10.1} {:<10.1}\n",
            r.ply, r.original.opt_time, r.simple.opt_time, r.original.max_time, r.simple.max_time
        ));
    }
    out
}
