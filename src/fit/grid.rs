//! Input grid for the objective.
//!
//! The objective is evaluated over a fixed Cartesian product of clocks,
//! increments and plies rather than sampled positions, so a score depends only
//! on the parameters being scored.

use crate::domain::TimeModelInput;
use crate::error::AppError;

/// Cartesian grid of `TimeModelInput` values.
#[derive(Debug, Clone, PartialEq)]
pub struct InputGrid {
    pub times_ms: Vec<f64>,
    pub increments_ms: Vec<f64>,
    pub plies: Vec<u32>,
}

impl Default for InputGrid {
    /// 4 clocks x 4 increments x 30 plies = 480 points.
    fn default() -> Self {
        Self {
            times_ms: vec![1_000.0, 10_000.0, 60_000.0, 300_000.0],
            increments_ms: vec![0.0, 100.0, 1_000.0, 5_000.0],
            plies: ply_range(0, 150, 5),
        }
    }
}

impl InputGrid {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.times_ms.is_empty() || self.increments_ms.is_empty() || self.plies.is_empty() {
            return Err(AppError::invalid_input(
                "Input grid must have at least one time, increment and ply.",
            ));
        }
        if self.times_ms.iter().any(|t| !(t.is_finite() && *t > 0.0)) {
            return Err(AppError::invalid_input("Grid times must be finite and > 0."));
        }
        if self.increments_ms.iter().any(|i| !(i.is_finite() && *i >= 0.0)) {
            return Err(AppError::invalid_input(
                "Grid increments must be finite and >= 0.",
            ));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.times_ms.len() * self.increments_ms.len() * self.plies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate points in time-major, then increment, then ply order.
    pub fn points(&self) -> impl Iterator<Item = TimeModelInput> + '_ {
        self.times_ms.iter().flat_map(move |&t| {
            self.increments_ms.iter().flat_map(move |&inc| {
                self.plies
                    .iter()
                    .map(move |&ply| TimeModelInput::new(t, inc, ply))
            })
        })
    }
}

/// Plies `start, start + step, ...` strictly below `end`.
pub fn ply_range(start: u32, end: u32, step: u32) -> Vec<u32> {
    (start..end).step_by(step.max(1) as usize).collect()
}
