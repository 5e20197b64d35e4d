//! Geometric utilities: reference bases and frame transport.

pub mod basis;
pub mod frame;

pub use basis::*;
pub use frame::*;
