//! `cnt-mesh` library crate.
//!
//! The binary (`cntmesh`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the numeric kernels (`math`, `curve`, `neighbor`, `strand`) are reusable
//!   without the CLI

pub mod app;
pub mod cli;
pub mod curve;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod neighbor;
pub mod plot;
pub mod report;
pub mod strand;
