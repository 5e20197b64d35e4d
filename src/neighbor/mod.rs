//! Nearest-neighbor distance analysis.
//!
//! Responsibilities:
//!
//! - brute-force minimum distance between two point sets (`distance`)
//! - the sentinel-diagonal distance matrix and per-curve minima (`matrix`, parallel)
//! - density and cutoff histograms (`histogram`)
//! - cutoff pair counts for populations too large for a matrix (`cutoff`)

pub mod cutoff;
pub mod distance;
pub mod histogram;
pub mod matrix;

pub use cutoff::*;
pub use distance::*;
pub use histogram::*;
pub use matrix::*;
