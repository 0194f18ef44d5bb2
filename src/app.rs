//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging
//! - parses CLI arguments
//! - runs the tune pipeline or evaluates saved parameters
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, PlotArgs, TableArgs, TuneArgs, VerifyArgs};
use crate::domain::{
    CandidateParameters, OriginalConstants, SimpleConstants, TuneConfig, VerificationSpec,
};
use crate::error::AppError;
use crate::io::read_params_json;
use crate::plot::{PlotSpec, render_time_plot};
use crate::report::{format_params, format_verification_table, verification_rows};

pub mod pipeline;

/// Entry point for the `tmfit` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    // `tmfit` and `tmfit --seed 7` behave like `tmfit tune ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tune(args) => handle_tune(args),
        Command::Table(args) => handle_table(args),
        Command::Plot(args) => handle_plot(args),
    }
}

/// Log to stderr, filtered by `RUST_LOG` (which may come from `.env`).
fn init_tracing() {
    dotenvy::dotenv().ok();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tm_fit=info"));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_tune(args: TuneArgs) -> Result<(), AppError> {
    let mut config = tune_config_from_args(&args);
    if let Some(path) = &args.start {
        config.start = read_params_json(path)?.params;
    }

    let prepared = pipeline::prepare(&config)?;
    println!("{}", crate::report::format_initial(prepared.initial_score));

    let run = pipeline::run_tune(&prepared, &config)?;

    println!("{}", crate::report::format_tune_summary(&run.sweep, &config));
    println!(
        "{}",
        format_verification_table(&run.verification, &config.verification)
    );
    if let Some(plot) = &run.plot {
        println!("{plot}");
    }

    if let Some(path) = &config.export {
        pipeline::export_params(path, &run, &config)?;
        tracing::info!(path = %path.display(), "wrote params");
    }

    Ok(())
}

fn handle_table(args: TableArgs) -> Result<(), AppError> {
    let params = load_params(args.params.as_deref())?;
    let spec = verification_spec_from_args(&args.verify);
    spec.validate()?;
    let rows = verification_rows(
        &params,
        &OriginalConstants::default(),
        &SimpleConstants::default(),
        &spec,
    );
    println!("Params:\n{}", format_params(&params));
    println!("{}", format_verification_table(&rows, &spec));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let params = load_params(args.params.as_deref())?;
    let spec = PlotSpec {
        time_ms: args.time,
        increment_ms: args.increment,
        max_ply: args.max_ply,
        width: args.width,
        height: args.height,
    };
    spec.validate()?;
    let plot = render_time_plot(
        &params,
        &OriginalConstants::default(),
        &SimpleConstants::default(),
        &spec,
    );
    println!("{plot}");
    Ok(())
}

fn load_params(path: Option<&std::path::Path>) -> Result<CandidateParameters, AppError> {
    match path {
        Some(p) => Ok(read_params_json(p)?.params),
        None => Ok(CandidateParameters::default()),
    }
}

pub fn verification_spec_from_args(args: &VerifyArgs) -> VerificationSpec {
    VerificationSpec {
        time_ms: args.time,
        increment_ms: args.increment,
        plies: args.plies.clone(),
    }
}

pub fn tune_config_from_args(args: &TuneArgs) -> TuneConfig {
    TuneConfig {
        iterations: args.iterations,
        seed: args.seed,
        restarts: args.restarts,
        progress_every: args.progress_every,
        penalty: args.penalty,
        penalty_factor: args.penalty_factor,
        verification: verification_spec_from_args(&args.verify),
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        export: args.export.clone(),
        ..TuneConfig::default()
    }
}

/// Rewrite argv so `tmfit` defaults to `tmfit tune`.
///
/// Rules:
/// - `tmfit`                      -> `tmfit tune`
/// - `tmfit --seed 7 ...`         -> `tmfit tune --seed 7 ...`
/// - `tmfit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tune".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tune" | "table" | "plot");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tune".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::domain::PenaltyMode;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tune() {
        assert_eq!(rewrite_args(argv(&["tmfit"])), argv(&["tmfit", "tune"]));
        assert_eq!(
            rewrite_args(argv(&["tmfit", "--seed", "7"])),
            argv(&["tmfit", "tune", "--seed", "7"])
        );
        assert_eq!(rewrite_args(argv(&["tmfit", "--help"])), argv(&["tmfit", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["tmfit", "table"])),
            argv(&["tmfit", "table"])
        );
    }

    #[test]
    fn tune_defaults_match_reference_run() {
        let cli = Cli::try_parse_from(rewrite_args(argv(&["tmfit"]))).unwrap();
        let Command::Tune(args) = cli.command else {
            panic!("expected tune");
        };
        let config = tune_config_from_args(&args);
        assert_eq!(config.iterations, 10_000);
        assert_eq!(config.penalty, PenaltyMode::Symmetric);
        assert_eq!(config.penalty_factor, 50.0);
        assert_eq!(config.restarts, 1);
        assert_eq!(config.verification, VerificationSpec::default());
        assert!(config.export.is_none());
        assert!(!config.plot);
    }

    #[test]
    fn tune_flags_map_onto_config() {
        let cli = Cli::try_parse_from(argv(&[
            "tmfit",
            "tune",
            "-n",
            "500",
            "--seed",
            "9",
            "--penalty",
            "asymmetric",
            "--penalty-factor",
            "20",
            "--restarts",
            "4",
            "--plies",
            "0,5,150",
            "--export",
            "out.json",
            "--plot",
        ]))
        .unwrap();
        let Command::Tune(args) = cli.command else {
            panic!("expected tune");
        };
        let config = tune_config_from_args(&args);
        assert_eq!(config.iterations, 500);
        assert_eq!(config.seed, 9);
        assert_eq!(config.penalty, PenaltyMode::Asymmetric);
        assert_eq!(config.penalty_factor, 20.0);
        assert_eq!(config.restarts, 4);
        assert_eq!(config.verification.plies, vec![0, 5, 150]);
        assert_eq!(config.export.as_deref(), Some(std::path::Path::new("out.json")));
        assert!(config.plot);
    }

    #[test]
    fn table_accepts_custom_clock() {
        let cli = Cli::try_parse_from(argv(&[
            "tmfit",
            "table",
            "--time",
            "300000",
            "--increment",
            "1000",
        ]))
        .unwrap();
        let Command::Table(args) = cli.command else {
            panic!("expected table");
        };
        let spec = verification_spec_from_args(&args.verify);
        assert_eq!(spec.time_ms, 300_000.0);
        assert_eq!(spec.increment_ms, 1_000.0);
        assert_eq!(spec.plies, VerificationSpec::default().plies);
        assert!(args.params.is_none());
    }

    #[test]
    fn negative_table_clock_is_rejected_before_evaluation() {
        let cli = Cli::try_parse_from(argv(&["tmfit", "table", "--time=-1000"])).unwrap();
        let Command::Table(args) = cli.command else {
            panic!("expected table");
        };
        let spec = verification_spec_from_args(&args.verify);
        assert_eq!(spec.time_ms, -1000.0);
        assert_eq!(spec.validate().unwrap_err().exit_code(), 2);
    }

    #[test]
    fn tune_with_nan_clock_fails_validation() {
        let cli = Cli::try_parse_from(argv(&["tmfit", "tune", "--time", "NaN"])).unwrap();
        let Command::Tune(args) = cli.command else {
            panic!("expected tune");
        };
        let config = tune_config_from_args(&args);
        assert_eq!(config.validate().unwrap_err().exit_code(), 2);
    }

    #[test]
    fn unknown_penalty_is_rejected() {
        assert!(Cli::try_parse_from(argv(&["tmfit", "tune", "--penalty", "cubic"])).is_err());
    }
}
