//! Parameter fitting.
//!
//! Responsibilities:
//!
//! - build the fixed input grid
//! - score a candidate against the reference formula
//! - hill-climb the candidate parameters
//! - run independent restarts in parallel and keep the best

pub mod climber;
pub mod grid;
pub mod objective;
pub mod sweep;

pub use climber::*;
pub use grid::*;
pub use objective::*;
pub use sweep::*;
