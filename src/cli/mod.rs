//! Command-line parsing for the time-management fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! formula/search code. Flags are mapped onto domain config in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_PENALTY_FACTOR, PenaltyMode};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "tmfit",
    version,
    about = "Fit a simplified chess time-management formula to the reference one"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Hill-climb the simplified parameters and print the result.
    Tune(TuneArgs),
    /// Print the verification table for saved (or default) parameters.
    Table(TableArgs),
    /// Plot both formulas over ply for saved (or default) parameters.
    Plot(PlotArgs),
}

/// Options for `tmfit tune`.
#[derive(Debug, Parser, Clone)]
pub struct TuneArgs {
    /// Number of hill-climbing iterations per restart.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub iterations: usize,

    /// Seed for the coordinate/sign stream.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Error weighting of the objective.
    #[arg(long, value_enum, default_value_t = PenaltyMode::Symmetric)]
    pub penalty: PenaltyMode,

    /// Multiplier for under-allocation errors in asymmetric mode.
    #[arg(long, default_value_t = DEFAULT_PENALTY_FACTOR)]
    pub penalty_factor: f64,

    /// Independent restarts (seeds `seed..seed+N`), run in parallel.
    #[arg(long, default_value_t = 1)]
    pub restarts: usize,

    /// Log progress every N iterations (0 disables).
    #[arg(long, default_value_t = 1000)]
    pub progress_every: usize,

    /// Start from parameters in a params JSON file instead of the defaults.
    #[arg(long, value_name = "JSON")]
    pub start: Option<PathBuf>,

    /// Write the fitted parameters to a params JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    #[command(flatten)]
    pub verify: VerifyArgs,

    /// Render an ASCII plot of both formulas after fitting.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Where the verification table is evaluated.
#[derive(Debug, Args, Clone)]
pub struct VerifyArgs {
    /// Remaining clock in milliseconds.
    #[arg(long, default_value_t = 60_000.0)]
    pub time: f64,

    /// Increment in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    pub increment: f64,

    /// Plies to tabulate (comma separated).
    #[arg(long, value_delimiter = ',', default_values_t = vec![0u32, 10, 20, 40, 80, 120])]
    pub plies: Vec<u32>,
}

/// Options for `tmfit table`.
#[derive(Debug, Parser, Clone)]
pub struct TableArgs {
    /// Params JSON produced by `tmfit tune --export` (defaults if omitted).
    #[arg(long, value_name = "JSON")]
    pub params: Option<PathBuf>,

    #[command(flatten)]
    pub verify: VerifyArgs,
}

/// Options for `tmfit plot`.
#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Params JSON produced by `tmfit tune --export` (defaults if omitted).
    #[arg(long, value_name = "JSON")]
    pub params: Option<PathBuf>,

    /// Remaining clock in milliseconds.
    #[arg(long, default_value_t = 60_000.0)]
    pub time: f64,

    /// Increment in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    pub increment: f64,

    /// Last ply on the x axis.
    #[arg(long, default_value_t = 150)]
    pub max_ply: u32,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
