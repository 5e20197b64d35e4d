//! Command-line parsing for the fiber mesh tools.
//!
//! Argument parsing and command dispatch stay separate from the numeric code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ExportFormat, Resolution};

/// Environment variable supplying the default mesh directory.
pub const MESH_DIR_ENV: &str = "CNT_MESH_DIR";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cntmesh", version, about = "CNT fiber mesh analysis: neighbor distances and single-CNT expansion")]
pub struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a mesh and print counts, interpolation and drop-order diagnostics.
    Summary(MeshArgs),
    /// Minimum distance between every pair of fibers, nearest neighbors and histogram.
    Neighbors(NeighborArgs),
    /// Expand every fiber into single CNTs and write position/orientation matrices.
    Strands(StrandArgs),
    /// Count single-CNT pairs closer than a cutoff radius.
    StrandNeighbors(StrandNeighborArgs),
    /// Write a seeded synthetic mesh in the loader's file format.
    Synth(SynthArgs),
}

/// Where the mesh comes from.
#[derive(Debug, Args, Clone)]
pub struct MeshArgs {
    /// Directory with `tube{i}.pos.dat` files (default: $CNT_MESH_DIR).
    #[arg(short, long, env = MESH_DIR_ENV, value_name = "DIR")]
    pub dir: PathBuf,

    /// Points per curve in the fine resolution.
    #[arg(long, default_value_t = 100)]
    pub fine_points: usize,
}

#[derive(Debug, Args, Clone)]
pub struct NeighborArgs {
    #[command(flatten)]
    pub mesh: MeshArgs,

    /// Point set used for distances.
    #[arg(short, long, value_enum, default_value_t = Resolution::Fine)]
    pub resolution: Resolution,

    /// Use only the first N curves.
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub limit: usize,

    /// Histogram bins.
    #[arg(long, default_value_t = 1000)]
    pub bins: usize,

    /// Histogram range minimum.
    #[arg(long, default_value_t = 0.0)]
    pub range_min: f64,

    /// Histogram range maximum.
    #[arg(long, default_value_t = 50.0)]
    pub range_max: f64,

    /// Compute matrix rows on one thread.
    #[arg(long)]
    pub sequential: bool,

    /// Render ASCII plots in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Write the matrix, nearest-neighbor table, histogram and JSON summary here.
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct StrandArgs {
    #[command(flatten)]
    pub mesh: MeshArgs,

    /// Outer (fiber) diameter.
    #[arg(long, default_value_t = 5.0)]
    pub fiber_diameter: f64,

    /// Inner (single CNT) diameter.
    #[arg(long, default_value_t = 1.4)]
    pub cnt_diameter: f64,

    /// Expand only the first N curves.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Re-orthonormalize the lateral frame axes every N samples.
    #[arg(long, value_name = "N")]
    pub renormalize_every: Option<usize>,

    /// Matrix file format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Both)]
    pub format: ExportFormat,

    /// Output directory (default: the mesh directory).
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct StrandNeighborArgs {
    #[command(flatten)]
    pub strands: StrandArgs,

    /// Cutoff radius for neighbor counts.
    #[arg(long, default_value_t = 5.0)]
    pub radius: f64,

    /// Bins between 0 and the cutoff radius.
    #[arg(long, default_value_t = 50)]
    pub bins: usize,

    /// Scan pairs on one thread.
    #[arg(long)]
    pub sequential: bool,

    /// Also write the sub-strand matrices.
    #[arg(long)]
    pub write_strands: bool,

    /// Write the counts as CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// Output directory.
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Number of `tube{i}.pos.dat` files.
    #[arg(long, default_value_t = 4)]
    pub files: usize,

    /// Fibers per file.
    #[arg(long, default_value_t = 25)]
    pub fibers: usize,

    /// Sections (rough points) per fiber.
    #[arg(long, default_value_t = 40)]
    pub sections: usize,

    /// Length of one section.
    #[arg(long, default_value_t = 20.0)]
    pub section_length: f64,

    /// Half-width of the square drop area.
    #[arg(long, default_value_t = 500.0)]
    pub half_extent: f64,

    /// Standard deviation of the bend per section (radians).
    #[arg(long, default_value_t = 0.1)]
    pub bend_sigma: f64,

    /// Height gained by each successive drop.
    #[arg(long, default_value_t = 1.0)]
    pub layer_height: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_neighbor_flags() {
        let cli = Cli::try_parse_from([
            "cntmesh", "-v", "neighbors", "--dir", "mesh", "-r", "rough", "-n", "50", "--no-plot",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Neighbors(args) => {
                assert_eq!(args.mesh.dir, PathBuf::from("mesh"));
                assert_eq!(args.resolution, Resolution::Rough);
                assert_eq!(args.limit, 50);
                assert_eq!(args.bins, 1000);
                assert!(args.no_plot);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_strand_neighbor_flags() {
        let cli = Cli::try_parse_from([
            "cntmesh",
            "strand-neighbors",
            "--dir",
            "mesh",
            "--radius",
            "3",
            "--format",
            "npy",
        ])
        .unwrap();
        match cli.command {
            Command::StrandNeighbors(args) => {
                assert_eq!(args.radius, 3.0);
                assert_eq!(args.strands.format, ExportFormat::Npy);
                assert_eq!(args.strands.fiber_diameter, 5.0);
                assert_eq!(args.strands.cnt_diameter, 1.4);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
