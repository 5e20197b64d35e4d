//! Reporting utilities: summary statistics and formatted terminal output.

pub mod format;

pub use format::*;

use serde::Serialize;

use crate::curve::Curve;
use crate::domain::Resolution;

/// Location and spread of a set of distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

/// Stats over the finite values; `None` when there are none.
pub fn distance_stats(values: impl IntoIterator<Item = f64>) -> Option<DistanceStats> {
    let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(DistanceStats {
        count: values.len(),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        mean,
        std: var.sqrt(),
    })
}

/// Mesh-level diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshStats {
    pub curves: usize,
    pub rough_nodes_min: usize,
    pub rough_nodes_max: usize,
    pub fine_nodes: usize,
    pub arc_length: Option<DistanceStats>,
    /// Spacing of consecutive fine points, pooled over all curves.
    pub fine_spacing: Option<DistanceStats>,
    /// Largest per-curve ratio of fine spacing std to mean (0 = perfectly uniform).
    pub fine_spacing_cv_max: f64,
    /// Mean `y` per curve, in load (drop) order.
    pub mean_y: Vec<f64>,
    /// Number of times a curve sits lower than the one dropped before it.
    pub drop_inversions: usize,
}

pub fn mesh_stats(curves: &[Curve]) -> MeshStats {
    let rough: Vec<usize> = curves.iter().map(|c| c.num_nodes(Resolution::Rough)).collect();
    let fine_nodes = curves.first().map_or(0, |c| c.num_nodes(Resolution::Fine));

    let spacings = curves.iter().flat_map(|c| {
        c.points(Resolution::Fine)
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .collect::<Vec<_>>()
    });
    let fine_spacing_cv_max = curves
        .iter()
        .filter_map(|c| c.spacing_stats(Resolution::Fine))
        .filter(|&(mean, _)| mean > 0.0)
        .map(|(mean, std)| std / mean)
        .fold(0.0, f64::max);

    let mean_y: Vec<f64> = curves.iter().map(Curve::mean_y).collect();
    let drop_inversions = mean_y.windows(2).filter(|w| w[1] < w[0]).count();

    MeshStats {
        curves: curves.len(),
        rough_nodes_min: rough.iter().copied().min().unwrap_or(0),
        rough_nodes_max: rough.iter().copied().max().unwrap_or(0),
        fine_nodes,
        arc_length: distance_stats(curves.iter().map(|c| c.arc_length(Resolution::Rough))),
        fine_spacing: distance_stats(spacings),
        fine_spacing_cv_max,
        mean_y,
        drop_inversions,
    }
}

/// Curve indices ordered by nearest-neighbor distance, closest first.
pub fn closest_curves(nearest: &[Option<f64>], top_n: usize) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = nearest
        .iter()
        .enumerate()
        .filter_map(|(i, d)| d.map(|d| (i, d)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn stats_ignore_non_finite() {
        let s = distance_stats([1.0, 3.0, f64::NAN, f64::INFINITY]).unwrap();
        assert_eq!(s.count, 2);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 3.0);
        assert_eq!(s.mean, 2.0);
        assert_eq!(s.std, 1.0);
        assert!(distance_stats(Vec::new()).is_none());
    }

    #[test]
    fn mesh_stats_track_drop_order() {
        let curve = |y: f64| {
            Curve::from_rough(
                vec![Point3::new(0.0, y, 0.0), Point3::new(1.0, y, 0.0), Point3::new(2.0, y, 0.0)],
                11,
            )
        };
        let curves = vec![curve(1.0), curve(2.0), curve(1.5), curve(3.0)];
        let s = mesh_stats(&curves);
        assert_eq!(s.curves, 4);
        assert_eq!((s.rough_nodes_min, s.rough_nodes_max, s.fine_nodes), (3, 3, 11));
        assert_eq!(s.mean_y, vec![1.0, 2.0, 1.5, 3.0]);
        assert_eq!(s.drop_inversions, 1);
        let spacing = s.fine_spacing.unwrap();
        assert!((spacing.mean - 0.2).abs() < 1e-9);
        assert!(s.fine_spacing_cv_max < 1e-6);
    }

    #[test]
    fn closest_curves_ranks_and_skips_missing() {
        let ranked = closest_curves(&[Some(2.0), None, Some(0.5), Some(2.0)], 2);
        assert_eq!(ranked, vec![(2, 0.5), (0, 2.0)]);
    }
}
