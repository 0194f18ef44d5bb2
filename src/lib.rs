//! `tm-fit` library crate.
//!
//! The binary (`tmfit`) is a thin wrapper around this library so that:
//!
//! - the formulas and the search are testable without spawning processes
//! - fitted parameters can be produced and consumed by other tools
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod models;
pub mod plot;
pub mod report;
