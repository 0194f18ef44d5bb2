//! Shared "tune pipeline" logic.
//!
//! Keeping this in one place keeps `app` focused on printing:
//! validate -> clamp start -> build objective -> sweep -> verification -> plot

use std::path::Path;

use tracing::{info, warn};

use crate::domain::{CandidateParameters, PARAM_NAMES, TuneConfig};
use crate::error::AppError;
use crate::fit::{ClimbOptions, Objective, SweepResult, run_sweep};
use crate::io::{ParamsFile, write_params_json};
use crate::plot::{PlotSpec, render_time_plot};
use crate::report::{VerificationRow, verification_rows};

/// Validated inputs for a run, with the initial score already computed.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub objective: Objective,
    pub start: CandidateParameters,
    pub initial_score: f64,
}

/// All computed outputs of a single `tmfit tune` run.
#[derive(Debug, Clone)]
pub struct TuneOutput {
    pub initial_score: f64,
    pub sweep: SweepResult,
    pub verification: Vec<VerificationRow>,
    pub plot: Option<String>,
}

/// Validate `config`, clamp the start into bounds and score it.
pub fn prepare(config: &TuneConfig) -> Result<Prepared, AppError> {
    config.validate()?;

    let mut start = config.start;
    let before = start;
    for idx in config.bounds.clamp_all(&mut start) {
        warn!(
            param = PARAM_NAMES[idx],
            from = before.get(idx),
            to = start.get(idx),
            "start value outside bounds; clamped"
        );
    }

    let objective = Objective::new(
        &config.grid,
        &config.original,
        config.simple,
        config.penalty,
        config.penalty_factor,
    );
    let initial_score = objective.score(&start);
    info!(
        penalty = config.penalty.display_name(),
        points = config.grid.len(),
        initial_score,
        "objective ready"
    );

    Ok(Prepared {
        objective,
        start,
        initial_score,
    })
}

/// Execute the search and compute the verification outputs.
pub fn run_tune(prepared: &Prepared, config: &TuneConfig) -> Result<TuneOutput, AppError> {
    let options = ClimbOptions {
        iterations: config.iterations,
        progress_every: config.progress_every,
    };
    let sweep = run_sweep(
        &prepared.objective,
        &config.bounds,
        &config.steps,
        prepared.start,
        options,
        config.seed,
        config.restarts,
    )?;

    let best = &sweep.best.result.params;
    let verification = verification_rows(
        best,
        &config.original,
        &config.simple,
        &config.verification,
    );

    let plot = config.plot.then(|| {
        let spec = PlotSpec {
            time_ms: config.verification.time_ms,
            increment_ms: config.verification.increment_ms,
            max_ply: config.verification.plies.iter().copied().max().unwrap_or(150),
            width: config.plot_width,
            height: config.plot_height,
        };
        render_time_plot(best, &config.original, &config.simple, &spec)
    });

    Ok(TuneOutput {
        initial_score: prepared.initial_score,
        sweep,
        verification,
        plot,
    })
}

/// Convenience wrapper: `prepare` followed by `run_tune`.
pub fn tune(config: &TuneConfig) -> Result<TuneOutput, AppError> {
    let prepared = prepare(config)?;
    run_tune(&prepared, config)
}

/// Write the best parameters of `run` as a params JSON file.
pub fn export_params(path: &Path, run: &TuneOutput, config: &TuneConfig) -> Result<(), AppError> {
    let file = ParamsFile::new(
        run.sweep.best.result.params,
        run.sweep.best.result.score,
        config.penalty,
        config.penalty_factor,
    );
    write_params_json(path, &file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PenaltyMode, VerificationSpec};
    use crate::io::read_params_json;

    fn small_config() -> TuneConfig {
        TuneConfig {
            iterations: 150,
            progress_every: 0,
            ..TuneConfig::default()
        }
    }

    #[test]
    fn tune_improves_or_keeps_initial_score() {
        let run = tune(&small_config()).unwrap();
        assert!(run.sweep.best.result.score <= run.initial_score);
        assert_eq!(run.initial_score, run.sweep.best.result.initial_score);
        assert_eq!(run.verification.len(), 6);
        assert_eq!(run.verification[0].ply, 0);
        assert!(run.plot.is_none());
    }

    #[test]
    fn out_of_bounds_start_is_clamped() {
        let config = TuneConfig {
            start: CandidateParameters {
                c_ply_pow: 1.3,
                ..CandidateParameters::default()
            },
            ..small_config()
        };
        let prepared = prepare(&config).unwrap();
        assert_eq!(prepared.start.c_ply_pow, 1.0);
        assert!(config.bounds.contains(&prepared.start));
    }

    #[test]
    fn invalid_config_fails_before_search() {
        let config = TuneConfig {
            restarts: 0,
            ..small_config()
        };
        assert_eq!(tune(&config).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn asymmetric_run_exports_and_plots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit.json");
        let config = TuneConfig {
            penalty: PenaltyMode::Asymmetric,
            restarts: 2,
            plot: true,
            plot_width: 40,
            plot_height: 10,
            verification: VerificationSpec {
                plies: vec![0, 60],
                ..VerificationSpec::default()
            },
            export: Some(path.clone()),
            ..small_config()
        };

        let run = tune(&config).unwrap();
        export_params(&path, &run, &config).unwrap();

        let saved = read_params_json(&path).unwrap();
        assert_eq!(saved.penalty, PenaltyMode::Asymmetric);
        let best = run.sweep.best.result.params.to_array();
        for (a, b) in saved.params.to_array().iter().zip(best.iter()) {
            assert!((a - b).abs() < 1e-12, "{a} vs {b}");
        }
        assert_eq!(run.sweep.runs.len(), 2);

        let plot = run.plot.unwrap();
        assert!(plot.contains("Plot: ply=[0, 60]"), "{plot}");
    }
}
