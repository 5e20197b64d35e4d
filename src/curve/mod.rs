//! Fiber centerlines.
//!
//! - the `Curve` entity with its rough/fine point sets (`fiber`)
//! - fine-resolution resampling (`resample`)
//! - per-sample unit tangents (`tangent`)

pub mod fiber;
pub mod resample;
pub mod tangent;

pub use fiber::*;
pub use resample::*;
pub use tangent::*;
