//! Shared domain types.
//!
//! These types are intentionally kept small and `Copy` where possible so the
//! search loop can clone candidates freely, and serializable so fitted
//! parameters can be exported and reloaded later.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::fit::InputGrid;

/// Number of fitted coordinates in `CandidateParameters`.
pub const PARAM_COUNT: usize = 7;

/// Coordinate names, in tuple order.
pub const PARAM_NAMES: [&str; PARAM_COUNT] = [
    "c_base",
    "c_ply_mult",
    "c_ply_pow",
    "bonus_val",
    "bonus_ply",
    "max_base",
    "max_ply_mult",
];

/// Default weight applied to under-allocation in `PenaltyMode::Asymmetric`.
pub const DEFAULT_PENALTY_FACTOR: f64 = 50.0;

/// One decision point: remaining clock, increment and game ply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeModelInput {
    pub time_ms: f64,
    /// `None` is treated as a zero increment.
    pub increment_ms: Option<f64>,
    pub ply: u32,
}

impl TimeModelInput {
    pub fn new(time_ms: f64, increment_ms: f64, ply: u32) -> Self {
        Self {
            time_ms,
            increment_ms: Some(increment_ms),
            ply,
        }
    }

    pub fn increment(&self) -> f64 {
        self.increment_ms.unwrap_or(0.0)
    }
}

/// Output of a time-management formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAllocation {
    /// Target time to spend on the move.
    pub opt_time: f64,
    /// Hard ceiling for the move.
    pub max_time: f64,
}

/// Constants of the reference formula.
///
/// The defaults are the engine's tuned values. They have no documented
/// derivation and are kept as opaque numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginalConstants {
    pub opt_value1: f64,
    pub opt_value2: f64,
    pub opt_value3: f64,
    pub optscale_value1: f64,
    pub optscale_value2: f64,
    pub optscale_value3: f64,
    pub optscale_value4: f64,
    pub max_value1: f64,
    pub max_value2: f64,
    pub max_value3: f64,
    pub maxscale_value1: f64,
    pub maxscale_value2: f64,
    pub bonus_ply: f64,
    pub bonus_value1: f64,
    /// Hard cap on `max_time` as a fraction of the remaining clock.
    pub max_time: f64,
    /// Assumed moves to go.
    pub mtg: f64,
}

impl Default for OriginalConstants {
    fn default() -> Self {
        Self {
            opt_value1: 0.64,
            opt_value2: 0.434,
            opt_value3: 0.66,
            optscale_value1: 1.645,
            optscale_value2: 2.476,
            optscale_value3: 0.483,
            optscale_value4: 0.26,
            max_value1: 2.877,
            max_value2: 2.85,
            max_value3: 2.717,
            maxscale_value1: 13.275,
            maxscale_value2: 5.141,
            bonus_ply: 11.475,
            bonus_value1: 0.452,
            max_time: 0.881,
            mtg: 28.0,
        }
    }
}

/// Fixed (non-fitted) parts of the simplified formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleConstants {
    pub mtg: f64,
    pub max_time_fraction: f64,
}

impl Default for SimpleConstants {
    fn default() -> Self {
        Self {
            mtg: 28.0,
            max_time_fraction: 0.8,
        }
    }
}

/// The 7 fitted coefficients of the simplified formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateParameters {
    pub c_base: f64,
    pub c_ply_mult: f64,
    pub c_ply_pow: f64,
    pub bonus_val: f64,
    pub bonus_ply: f64,
    pub max_base: f64,
    pub max_ply_mult: f64,
}

impl Default for CandidateParameters {
    fn default() -> Self {
        Self::from_array([0.016, 0.007, 0.5, 0.04, 12.0, 5.0, 0.0])
    }
}

impl CandidateParameters {
    pub fn from_array(v: [f64; PARAM_COUNT]) -> Self {
        Self {
            c_base: v[0],
            c_ply_mult: v[1],
            c_ply_pow: v[2],
            bonus_val: v[3],
            bonus_ply: v[4],
            max_base: v[5],
            max_ply_mult: v[6],
        }
    }

    pub fn to_array(&self) -> [f64; PARAM_COUNT] {
        [
            self.c_base,
            self.c_ply_mult,
            self.c_ply_pow,
            self.bonus_val,
            self.bonus_ply,
            self.max_base,
            self.max_ply_mult,
        ]
    }

    /// # Panics
    /// Panics if `idx >= PARAM_COUNT`.
    pub fn get(&self, idx: usize) -> f64 {
        self.to_array()[idx]
    }

    /// # Panics
    /// Panics if `idx >= PARAM_COUNT`.
    pub fn set(&mut self, idx: usize, value: f64) {
        let mut v = self.to_array();
        v[idx] = value;
        *self = Self::from_array(v);
    }
}

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Snap `value` to the nearest point of the interval.
    pub fn clamp(&self, value: f64) -> f64 {
        self.min.max(self.max.min(value))
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Per-coordinate bounds for `CandidateParameters`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamBounds(pub [Bound; PARAM_COUNT]);

impl Default for ParamBounds {
    fn default() -> Self {
        Self([
            Bound::new(0.005, 0.05),
            Bound::new(0.0, 0.02),
            Bound::new(0.1, 1.0),
            Bound::new(0.0, 0.2),
            Bound::new(0.0, 30.0),
            Bound::new(1.0, 10.0),
            Bound::new(0.0, 0.5),
        ])
    }
}

impl ParamBounds {
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, b) in PARAM_NAMES.iter().zip(self.0.iter()) {
            if !(b.min.is_finite() && b.max.is_finite() && b.min <= b.max) {
                return Err(AppError::invalid_input(format!(
                    "Invalid bound for {name}: [{}, {}] (must be finite with min <= max).",
                    b.min, b.max
                )));
            }
        }
        Ok(())
    }

    /// Clamp one coordinate of `params` into its interval.
    pub fn clamp_coordinate(&self, params: &mut CandidateParameters, idx: usize) {
        let value = params.get(idx);
        params.set(idx, self.0[idx].clamp(value));
    }

    /// Clamp every coordinate, returning the indices that moved.
    pub fn clamp_all(&self, params: &mut CandidateParameters) -> Vec<usize> {
        let mut moved = Vec::new();
        for idx in 0..PARAM_COUNT {
            let before = params.get(idx);
            self.clamp_coordinate(params, idx);
            if params.get(idx) != before {
                moved.push(idx);
            }
        }
        moved
    }

    pub fn contains(&self, params: &CandidateParameters) -> bool {
        params
            .to_array()
            .iter()
            .zip(self.0.iter())
            .all(|(&v, b)| b.contains(v))
    }
}

/// Per-coordinate perturbation size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSizes(pub [f64; PARAM_COUNT]);

impl Default for StepSizes {
    fn default() -> Self {
        Self([0.001, 0.0005, 0.05, 0.01, 1.0, 0.2, 0.01])
    }
}

impl StepSizes {
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, &s) in PARAM_NAMES.iter().zip(self.0.iter()) {
            if !(s.is_finite() && s > 0.0) {
                return Err(AppError::invalid_input(format!(
                    "Invalid step size for {name}: {s} (must be finite and > 0)."
                )));
            }
        }
        Ok(())
    }
}

/// How the objective weights errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyMode {
    /// Plain squared log-difference.
    Symmetric,
    /// Squared log-difference, multiplied by the penalty factor whenever the
    /// simplified formula allocates less than the reference.
    Asymmetric,
}

impl PenaltyMode {
    pub fn display_name(self) -> &'static str {
        match self {
            PenaltyMode::Symmetric => "symmetric",
            PenaltyMode::Asymmetric => "asymmetric",
        }
    }
}

/// Where the verification table is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationSpec {
    pub time_ms: f64,
    pub increment_ms: f64,
    pub plies: Vec<u32>,
}

/// Reject clocks the formulas are not defined for.
pub fn validate_clock(time_ms: f64, increment_ms: f64) -> Result<(), AppError> {
    if !(time_ms.is_finite() && time_ms > 0.0) {
        return Err(AppError::invalid_input(format!(
            "Invalid time {time_ms}ms (must be finite and > 0)."
        )));
    }
    if !(increment_ms.is_finite() && increment_ms >= 0.0) {
        return Err(AppError::invalid_input(format!(
            "Invalid increment {increment_ms}ms (must be finite and >= 0)."
        )));
    }
    Ok(())
}

impl VerificationSpec {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_clock(self.time_ms, self.increment_ms)
    }
}

impl Default for VerificationSpec {
    fn default() -> Self {
        Self {
            time_ms: 60_000.0,
            increment_ms: 0.0,
            plies: vec![0, 10, 20, 40, 80, 120],
        }
    }
}

/// Full configuration of a `tmfit tune` run.
#[derive(Debug, Clone)]
pub struct TuneConfig {
    pub iterations: usize,
    pub seed: u64,
    pub restarts: usize,
    /// Log progress every N iterations (0 disables progress lines).
    pub progress_every: usize,
    pub penalty: PenaltyMode,
    pub penalty_factor: f64,
    pub start: CandidateParameters,
    pub bounds: ParamBounds,
    pub steps: StepSizes,
    pub grid: InputGrid,
    pub original: OriginalConstants,
    pub simple: SimpleConstants,
    pub verification: VerificationSpec,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export: Option<PathBuf>,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            seed: 42,
            restarts: 1,
            progress_every: 1000,
            penalty: PenaltyMode::Symmetric,
            penalty_factor: DEFAULT_PENALTY_FACTOR,
            start: CandidateParameters::default(),
            bounds: ParamBounds::default(),
            steps: StepSizes::default(),
            grid: InputGrid::default(),
            original: OriginalConstants::default(),
            simple: SimpleConstants::default(),
            verification: VerificationSpec::default(),
            plot: false,
            plot_width: 100,
            plot_height: 25,
            export: None,
        }
    }
}

impl TuneConfig {
    /// Reject configurations the search cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.iterations == 0 {
            return Err(AppError::invalid_input("Iterations must be > 0."));
        }
        if self.restarts == 0 {
            return Err(AppError::invalid_input("Restarts must be > 0."));
        }
        if !(self.penalty_factor.is_finite() && self.penalty_factor >= 1.0) {
            return Err(AppError::invalid_input(format!(
                "Invalid penalty factor {} (must be finite and >= 1).",
                self.penalty_factor
            )));
        }
        self.bounds.validate()?;
        self.steps.validate()?;
        self.grid.validate()?;
        self.verification.validate()?;
        Ok(())
    }
}
