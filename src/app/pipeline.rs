//! Shared pipeline logic behind the subcommands.
//!
//! load mesh -> distance matrix -> nearest neighbors -> histogram
//! load mesh -> offset pattern -> per-curve frames -> sub-strands -> [cutoff histogram]
//!
//! Everything here computes in memory; printing and file exports stay in `app`.

use crate::curve::Curve;
use crate::domain::{NeighborConfig, StrandConfig, StrandNeighborConfig};
use crate::error::MeshError;
use crate::math::ReferenceAxes;
use crate::neighbor::{DistanceMatrix, Histogram, cutoff_pair_histogram, density_histogram, distance_matrix};
use crate::report::{DistanceStats, distance_stats};
use crate::strand::{OffsetPattern, StrandSet, expand_curve, hcp_offsets};

/// All computed outputs of a `neighbors` run.
#[derive(Debug, Clone)]
pub struct NeighborRun {
    pub matrix: DistanceMatrix,
    pub nearest: Vec<Option<f64>>,
    pub nearest_index: Vec<Option<usize>>,
    /// Over the upper-triangle pair values.
    pub pair_stats: Option<DistanceStats>,
    pub nearest_stats: Option<DistanceStats>,
    pub histogram: Histogram,
}

pub fn run_neighbors(curves: &[Curve], config: &NeighborConfig) -> Result<NeighborRun, MeshError> {
    if config.limit == 0 {
        return Err(MeshError::InvalidConfig("curve limit must be > 0".to_string()));
    }

    let n = config.limit.min(curves.len());
    log::info!(
        "computing {} pair distances over {n} curves ({} resolution)",
        n * n.saturating_sub(1) / 2,
        config.resolution
    );
    let matrix = distance_matrix(curves, config.resolution, config.limit, config.parallel);
    if matrix.len() < 2 {
        log::warn!("only {} curve(s) in the population; no nearest neighbors", matrix.len());
    }

    let nearest = matrix.nearest_neighbors();
    let nearest_index = matrix.nearest_indices();
    let pair_stats = distance_stats(matrix.pair_values());
    let nearest_stats = distance_stats(nearest.iter().flatten().copied());
    let histogram = density_histogram(matrix.pair_values(), config.bins, config.range_min, config.range_max)?;

    Ok(NeighborRun {
        matrix,
        nearest,
        nearest_index,
        pair_stats,
        nearest_stats,
        histogram,
    })
}

/// All computed outputs of a `strands` run.
#[derive(Debug, Clone)]
pub struct StrandRun {
    pub pattern: OffsetPattern,
    pub strands: StrandSet,
    pub curves: usize,
    /// Curves on which at least one frame fallback was taken.
    pub flagged_curves: usize,
}

pub fn run_strands(curves: &[Curve], config: &StrandConfig) -> Result<StrandRun, MeshError> {
    let pattern = hcp_offsets(config.fiber_diameter, config.cnt_diameter)?;
    log::info!("number of cnts per fiber: {}", pattern.len());

    let axes = ReferenceAxes::default();
    let take = config.limit.unwrap_or(curves.len());
    let mut strands = StrandSet::default();
    let mut flagged_curves = 0;
    for (i, curve) in curves.iter().take(take).enumerate() {
        let out = expand_curve(i, curve, &pattern, &axes, &config.transport)?;
        if !out.degeneracies.is_empty() {
            flagged_curves += 1;
        }
        strands.push(out.cloud);
    }
    // Matrix outputs need one sample count across curves.
    strands.samples()?;

    Ok(StrandRun {
        pattern,
        curves: strands.clouds().len(),
        strands,
        flagged_curves,
    })
}

/// Raw pair counts between every two sub-strands.
pub fn run_strand_neighbors(strands: &StrandSet, config: &StrandNeighborConfig) -> Result<Histogram, MeshError> {
    let sets = strands.packed_strands();
    log::info!(
        "scanning {} sub-strand pairs (cutoff radius {})",
        sets.len() * sets.len().saturating_sub(1) / 2,
        config.radius
    );
    cutoff_pair_histogram(&sets, config.radius, config.bins, config.parallel)
}

/// Metadata line stored in sub-strand matrix headers.
pub fn strand_metadata(config: &StrandConfig) -> String {
    format!(
        "fiber diameter: {}, cnt diameter: {}",
        config.fiber_diameter, config.cnt_diameter
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExportFormat, MeshConfig, Resolution, TransportConfig};
    use nalgebra::Point3;
    use std::path::PathBuf;

    fn mesh() -> MeshConfig {
        MeshConfig {
            dir: PathBuf::from("."),
            fine_points: 20,
        }
    }

    fn straight(y: f64) -> Curve {
        Curve::from_rough(
            vec![Point3::new(0.0, y, 0.0), Point3::new(5.0, y, 0.0), Point3::new(10.0, y, 0.0)],
            20,
        )
    }

    fn neighbor_config() -> NeighborConfig {
        NeighborConfig {
            mesh: mesh(),
            resolution: Resolution::Fine,
            limit: 1000,
            bins: 10,
            range_min: 0.0,
            range_max: 10.0,
            parallel: false,
            plot: false,
            plot_width: 40,
            plot_height: 10,
            export_dir: None,
        }
    }

    fn strand_config() -> StrandConfig {
        StrandConfig {
            mesh: mesh(),
            fiber_diameter: 3.0,
            cnt_diameter: 1.0,
            limit: None,
            transport: TransportConfig::default(),
            format: ExportFormat::Text,
            output_dir: None,
        }
    }

    #[test]
    fn neighbors_over_stacked_lines() {
        let curves = vec![straight(0.0), straight(2.0), straight(5.0)];
        let run = run_neighbors(&curves, &neighbor_config()).unwrap();
        assert_eq!(run.nearest, vec![Some(2.0), Some(2.0), Some(3.0)]);
        assert_eq!(run.nearest_index, vec![Some(1), Some(0), Some(1)]);
        let pairs = run.pair_stats.unwrap();
        assert_eq!(pairs.count, 3);
        assert_eq!((pairs.min, pairs.max), (2.0, 5.0));
        assert_eq!(run.histogram.total(), 3);
        let integral: f64 = run.histogram.density.iter().sum::<f64>() * run.histogram.width();
        assert!((integral - 1.0).abs() < 1e-12);
    }

    #[test]
    fn neighbor_limit_truncates_population() {
        let curves = vec![straight(0.0), straight(2.0), straight(5.0)];
        let mut config = neighbor_config();
        config.limit = 2;
        let run = run_neighbors(&curves, &config).unwrap();
        assert_eq!(run.matrix.len(), 2);
        config.limit = 0;
        assert!(run_neighbors(&curves, &config).is_err());
    }

    #[test]
    fn strands_cover_every_curve() {
        let curves = vec![straight(0.0), straight(10.0)];
        let run = run_strands(&curves, &strand_config()).unwrap();
        assert_eq!(run.pattern.len(), 7);
        assert_eq!(run.curves, 2);
        assert_eq!(run.strands.total_strands(), 14);
        assert_eq!(run.flagged_curves, 0);
        assert_eq!(strand_metadata(&strand_config()), "fiber diameter: 3, cnt diameter: 1");
    }

    #[test]
    fn strand_neighbors_count_close_pairs() {
        let curves = vec![straight(0.0), straight(10.0)];
        let run = run_strands(&curves, &strand_config()).unwrap();
        let config = StrandNeighborConfig {
            strands: strand_config(),
            radius: 1.2,
            bins: 2,
            parallel: false,
        };
        let hist = run_strand_neighbors(&run.strands, &config).unwrap();
        // Within a 7-strand bundle: 6 center-ring pairs and 6 adjacent ring
        // pairs at distance 1, none across the two fibers.
        assert_eq!(hist.counts, vec![0, 24]);
    }
}
