//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the resolution selector (`Resolution`) and export format enum
//! - typed run configuration for each operation
//! - the serializable run summary (`RunSummary`)

pub mod types;

pub use types::*;
