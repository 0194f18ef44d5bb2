//! Read/write parameter JSON files.
//!
//! A params file is the portable result of a `tmfit tune` run: the fitted
//! coefficients plus enough metadata to know how they were scored. `table`,
//! `plot` and `tune --start` all read it back.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::{CandidateParameters, PenaltyMode};
use crate::error::AppError;

/// On-disk schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamsFile {
    pub tool: String,
    pub generated_at: DateTime<Local>,
    pub penalty: PenaltyMode,
    pub penalty_factor: f64,
    pub score: f64,
    pub params: CandidateParameters,
}

impl ParamsFile {
    pub fn new(
        params: CandidateParameters,
        score: f64,
        penalty: PenaltyMode,
        penalty_factor: f64,
    ) -> Self {
        Self {
            tool: "tmfit".to_string(),
            generated_at: Local::now(),
            penalty,
            penalty_factor,
            score,
            params,
        }
    }
}

/// Write a params JSON file.
pub fn write_params_json(path: &Path, file: &ParamsFile) -> Result<(), AppError> {
    let out = File::create(path).map_err(|e| {
        AppError::output(format!("Failed to create params JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::output(format!("Failed to write params JSON: {e}")))?;
    Ok(())
}

/// Read a params JSON file.
pub fn read_params_json(path: &Path) -> Result<ParamsFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::invalid_input(format!("Failed to open params JSON '{}': {e}", path.display()))
    })?;
    let parsed: ParamsFile = serde_json::from_reader(file)
        .map_err(|e| AppError::invalid_input(format!("Invalid params JSON: {e}")))?;
    if parsed.params.to_array().iter().any(|v| !v.is_finite()) {
        return Err(AppError::invalid_input(
            "Invalid params JSON: coefficients must be finite.",
        ));
    }
    Ok(parsed)
}
