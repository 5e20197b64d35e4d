//! Input/output helpers.
//!
//! - curve loader (`ingest`)
//! - dense matrix buffer shared by the writers (`array`)
//! - Armadillo text and CSV exports (`export`)
//! - NumPy binary arrays (`npy`)
//! - JSON run summary (`summary`)

pub mod array;
pub mod export;
pub mod ingest;
pub mod npy;
pub mod summary;

pub use array::*;
pub use export::*;
pub use ingest::*;
pub use npy::*;
pub use summary::*;
