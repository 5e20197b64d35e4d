//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments into typed configs
//! - loads the mesh and runs the requested computation
//! - prints reports/plots
//! - writes exports once the computation succeeded

use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::json;

use crate::cli::{Command, MeshArgs, NeighborArgs, StrandArgs, StrandNeighborArgs, SynthArgs};
use crate::domain::{
    MeshConfig, NeighborConfig, RunSummary, StrandConfig, StrandNeighborConfig, SynthConfig, TransportConfig,
};
use crate::error::{AppError, MeshError};
use crate::io::{LoadedMesh, load_mesh};

pub mod pipeline;

/// Entry point for the `cntmesh` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is fine; the CLI falls back to flags and defaults.
    let _ = dotenvy::dotenv();

    let cli = crate::cli::Cli::parse();
    let env_level = std::env::var(crate::logging::LOG_ENV).ok();
    crate::logging::init(crate::logging::resolve_level(cli.verbose, cli.quiet, env_level.as_deref()));

    match cli.command {
        Command::Summary(args) => handle_summary(&args),
        Command::Neighbors(args) => handle_neighbors(&args),
        Command::Strands(args) => handle_strands(&args),
        Command::StrandNeighbors(args) => handle_strand_neighbors(&args),
        Command::Synth(args) => handle_synth(&args),
    }
}

fn load(mesh: &MeshConfig) -> Result<LoadedMesh, AppError> {
    Ok(load_mesh(mesh)?)
}

fn handle_summary(args: &MeshArgs) -> Result<(), AppError> {
    let mesh = mesh_config_from_args(args);
    let loaded = load(&mesh)?;
    let stats = crate::report::mesh_stats(&loaded.curves);
    println!("{}", crate::report::format_mesh_summary(&mesh.dir, &loaded.files, &stats));
    Ok(())
}

fn handle_neighbors(args: &NeighborArgs) -> Result<(), AppError> {
    let config = neighbor_config_from_args(args);
    let loaded = load(&config.mesh)?;
    let run = pipeline::run_neighbors(&loaded.curves, &config)?;

    println!(
        "{}",
        crate::report::format_neighbor_report(&run, &config, loaded.curves.len())
    );

    if config.plot {
        println!(
            "{}",
            crate::plot::render_nearest_plot(&run.nearest, config.plot_width, config.plot_height)
        );
        println!(
            "{}",
            crate::plot::render_histogram_plot(&run.histogram, config.plot_width, config.plot_height)
        );
    }

    if let Some(dir) = &config.export_dir {
        let written = export_neighbors(dir, &run, &config)?;
        for path in written {
            log::info!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn export_neighbors(dir: &Path, run: &pipeline::NeighborRun, config: &NeighborConfig) -> Result<Vec<PathBuf>, MeshError> {
    std::fs::create_dir_all(dir).map_err(|e| MeshError::io(dir, e))?;

    let matrix_path = dir.join("pair_min_dist.dat");
    let metadata = format!(
        "minimum distance between fibers, resolution: {}, sentinel: {}",
        config.resolution,
        crate::neighbor::SENTINEL
    );
    crate::io::write_distance_matrix(&matrix_path, &run.matrix, &metadata)?;

    let nearest_path = dir.join("min_dist_per_fiber.csv");
    crate::io::write_nearest_csv(&nearest_path, &run.nearest, &run.nearest_index)?;

    let hist_path = dir.join("distance_distribution.csv");
    crate::io::write_histogram_csv(&hist_path, &run.histogram)?;

    let summary_path = dir.join("neighbors_summary.json");
    let summary = RunSummary::new(
        "neighbors",
        &config.mesh.dir,
        run.matrix.len(),
        json!({
            "resolution": config.resolution,
            "limit": config.limit,
            "fine_points": config.mesh.fine_points,
            "bins": config.bins,
            "range": [config.range_min, config.range_max],
        }),
        json!({
            "pair_distance": run.pair_stats,
            "nearest_neighbor": run.nearest_stats,
            "histogram_in_range": run.histogram.total(),
        }),
    );
    crate::io::write_summary_json(&summary_path, &summary)?;

    Ok(vec![matrix_path, nearest_path, hist_path, summary_path])
}

fn handle_strands(args: &StrandArgs) -> Result<(), AppError> {
    let config = strand_config_from_args(args);
    let loaded = load(&config.mesh)?;
    let run = pipeline::run_strands(&loaded.curves, &config)?;
    let written = export_strands(&run, &config)?;
    println!("{}", crate::report::format_strand_report(&run, &config, &written));
    Ok(())
}

fn export_strands(run: &pipeline::StrandRun, config: &StrandConfig) -> Result<Vec<PathBuf>, MeshError> {
    let dir = config.output_dir.as_deref().unwrap_or(&config.mesh.dir);
    let mut written =
        crate::io::write_strand_exports(dir, &run.strands, config.format, &pipeline::strand_metadata(config))?;

    let summary_path = dir.join("single_cnt_summary.json");
    let summary = RunSummary::new(
        "strands",
        &config.mesh.dir,
        run.curves,
        json!({
            "fiber_diameter": config.fiber_diameter,
            "cnt_diameter": config.cnt_diameter,
            "fine_points": config.mesh.fine_points,
            "renormalize_every": config.transport.renormalize_every,
        }),
        json!({
            "cnts_per_fiber": run.pattern.len(),
            "strands": run.strands.total_strands(),
            "flagged_curves": run.flagged_curves,
        }),
    );
    crate::io::write_summary_json(&summary_path, &summary)?;
    written.push(summary_path);
    Ok(written)
}

fn handle_strand_neighbors(args: &StrandNeighborArgs) -> Result<(), AppError> {
    let config = strand_neighbor_config_from_args(args);
    let loaded = load(&config.strands.mesh)?;
    let run = pipeline::run_strands(&loaded.curves, &config.strands)?;
    let hist = pipeline::run_strand_neighbors(&run.strands, &config)?;

    if args.write_strands {
        for path in export_strands(&run, &config.strands)? {
            log::info!("wrote {}", path.display());
        }
    }
    if let Some(path) = &args.export {
        crate::io::write_histogram_csv(path, &hist)?;
        log::info!("wrote {}", path.display());
    }

    println!(
        "{}",
        crate::report::format_strand_neighbor_report(&hist, run.strands.total_strands(), &config)
    );
    Ok(())
}

fn handle_synth(args: &SynthArgs) -> Result<(), AppError> {
    let config = synth_config_from_args(args);
    let written = crate::data::write_synthetic_mesh(&config)?;
    println!(
        "Wrote {} files ({} fibers) to {}",
        written.len(),
        config.files * config.fibers_per_file,
        config.output_dir.display()
    );
    Ok(())
}

pub fn mesh_config_from_args(args: &MeshArgs) -> MeshConfig {
    MeshConfig {
        dir: args.dir.clone(),
        fine_points: args.fine_points,
    }
}

pub fn neighbor_config_from_args(args: &NeighborArgs) -> NeighborConfig {
    NeighborConfig {
        mesh: mesh_config_from_args(&args.mesh),
        resolution: args.resolution,
        limit: args.limit,
        bins: args.bins,
        range_min: args.range_min,
        range_max: args.range_max,
        parallel: !args.sequential,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_dir: args.export.clone(),
    }
}

pub fn strand_config_from_args(args: &StrandArgs) -> StrandConfig {
    StrandConfig {
        mesh: mesh_config_from_args(&args.mesh),
        fiber_diameter: args.fiber_diameter,
        cnt_diameter: args.cnt_diameter,
        limit: args.limit,
        transport: TransportConfig {
            renormalize_every: args.renormalize_every.filter(|&n| n > 0),
        },
        format: args.format,
        output_dir: args.output.clone(),
    }
}

pub fn strand_neighbor_config_from_args(args: &StrandNeighborArgs) -> StrandNeighborConfig {
    StrandNeighborConfig {
        strands: strand_config_from_args(&args.strands),
        radius: args.radius,
        bins: args.bins,
        parallel: !args.sequential,
    }
}

pub fn synth_config_from_args(args: &SynthArgs) -> SynthConfig {
    SynthConfig {
        output_dir: args.output.clone(),
        files: args.files,
        fibers_per_file: args.fibers,
        sections: args.sections,
        section_length: args.section_length,
        half_extent: args.half_extent,
        bend_sigma: args.bend_sigma,
        layer_height: args.layer_height,
        seed: args.seed,
    }
}
