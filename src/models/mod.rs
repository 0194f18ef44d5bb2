//! Time-management formula implementations.
//!
//! Both formulas are small, pure functions so that the objective and search
//! code can stay generic.

pub mod model;

pub use model::*;
