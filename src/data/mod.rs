//! Input data sources beyond the loader: the seeded synthetic mesh.

pub mod synth;

pub use synth::*;
