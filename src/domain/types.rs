//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - threaded through the pipeline as typed configuration
//! - exported to JSON alongside the numeric outputs
//! - reloaded later for comparisons between runs

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which point set of a curve a computation runs on.
///
/// `Rough` is the mesh as produced by the simulation (one point per section);
/// `Fine` is the resampled centerline used for sub-strand placement and
/// precise distance scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Rough,
    Fine,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Rough => "rough",
            Resolution::Fine => "fine",
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-disk representation for sub-strand matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Armadillo-compatible text (`.dat`).
    Text,
    /// NumPy binary (`.npy`).
    Npy,
    /// Both of the above.
    Both,
}

impl ExportFormat {
    pub fn text(self) -> bool {
        matches!(self, ExportFormat::Text | ExportFormat::Both)
    }

    pub fn npy(self) -> bool {
        matches!(self, ExportFormat::Npy | ExportFormat::Both)
    }
}

/// How the mesh is loaded and prepared.
#[derive(Debug, Clone)]
pub struct MeshConfig {
    /// Directory containing `tube{i}.pos.dat` files.
    pub dir: PathBuf,
    /// Number of points in each curve's fine resolution.
    pub fine_points: usize,
}

/// Frame transport knobs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransportConfig {
    /// Re-orthonormalize the lateral axes every `n` samples.
    ///
    /// `None` reproduces the plain rotation fold (no correction). Enabling it
    /// changes numeric results on long curves.
    pub renormalize_every: Option<usize>,
}

/// Configuration for a nearest-neighbor distance run.
#[derive(Debug, Clone)]
pub struct NeighborConfig {
    pub mesh: MeshConfig,
    pub resolution: Resolution,
    /// Only the first `limit` curves enter the distance matrix.
    pub limit: usize,
    pub bins: usize,
    pub range_min: f64,
    pub range_max: f64,
    pub parallel: bool,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    /// Directory for CSV/matrix/JSON exports.
    pub export_dir: Option<PathBuf>,
}

/// Configuration for sub-strand expansion.
#[derive(Debug, Clone)]
pub struct StrandConfig {
    pub mesh: MeshConfig,
    pub fiber_diameter: f64,
    pub cnt_diameter: f64,
    /// Expand only the first `limit` curves (all when `None`).
    pub limit: Option<usize>,
    pub transport: TransportConfig,
    pub format: ExportFormat,
    pub output_dir: Option<PathBuf>,
}

/// Configuration for the sub-strand neighbor histogram.
#[derive(Debug, Clone)]
pub struct StrandNeighborConfig {
    pub strands: StrandConfig,
    /// Histogram cutoff; also the initial pair minimum is `radius + 1`.
    pub radius: f64,
    pub bins: usize,
    pub parallel: bool,
}

/// Configuration for the synthetic mesh generator.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub output_dir: PathBuf,
    /// Number of `tube{i}.pos.dat` files.
    pub files: usize,
    /// Fibers per file.
    pub fibers_per_file: usize,
    /// Rough sections per fiber.
    pub sections: usize,
    pub section_length: f64,
    /// Half-width of the square drop area in x and z.
    pub half_extent: f64,
    /// Standard deviation of the per-section bend angle (radians).
    pub bend_sigma: f64,
    /// Vertical spacing between successive drops.
    pub layer_height: f64,
    pub seed: u64,
}

/// A JSON summary written next to the numeric outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub tool: String,
    pub generated: String,
    pub operation: String,
    pub mesh_dir: PathBuf,
    pub curves: usize,
    pub parameters: serde_json::Value,
    pub statistics: serde_json::Value,
}
