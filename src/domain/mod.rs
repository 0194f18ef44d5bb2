//! Domain types used throughout the fitter.
//!
//! This module defines:
//!
//! - formula inputs and outputs (`TimeModelInput`, `TimeAllocation`)
//! - formula constants (`OriginalConstants`, `SimpleConstants`)
//! - the fitted parameter tuple and its bounds/steps
//! - run configuration (`TuneConfig`, `PenaltyMode`, `VerificationSpec`)

pub mod types;

pub use types::*;
