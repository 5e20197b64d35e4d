//! Sub-strand ("single CNT") expansion.
//!
//! - hexagonal close-packed cross-section offsets (`pattern`)
//! - placement along transported frames (`expand`)
//! - per-curve and aggregated point clouds (`cloud`)

pub mod cloud;
pub mod expand;
pub mod pattern;

pub use cloud::*;
pub use expand::*;
pub use pattern::*;
