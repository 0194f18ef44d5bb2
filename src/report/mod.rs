//! Reporting utilities: verification rows and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{
    CandidateParameters, OriginalConstants, SimpleConstants, TimeAllocation, TimeModelInput,
    VerificationSpec,
};
use crate::models::{original_time, simple_time};

/// Both formulas evaluated at one ply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerificationRow {
    pub ply: u32,
    pub original: TimeAllocation,
    pub simple: TimeAllocation,
}

/// Evaluate both formulas at every ply of `spec`.
pub fn verification_rows(
    params: &CandidateParameters,
    original: &OriginalConstants,
    simple: &SimpleConstants,
    spec: &VerificationSpec,
) -> Vec<VerificationRow> {
    spec.plies
        .iter()
        .map(|&ply| {
            let input = TimeModelInput::new(spec.time_ms, spec.increment_ms, ply);
            VerificationRow {
                ply,
                original: original_time(original, &input),
                simple: simple_time(params, simple, &input),
            }
        })
        .collect()
}
