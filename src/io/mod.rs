//! Input/output helpers.
//!
//! - parameter JSON read/write (`params`)

pub mod params;

pub use params::*;
