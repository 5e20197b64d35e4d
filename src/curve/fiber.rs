//! The `Curve` entity: one fiber centerline at two resolutions.

use nalgebra::{Point3, Vector3};

use crate::curve::resample::{cumulative_lengths, resample_fine};
use crate::curve::tangent::{Tangents, compute_tangents};
use crate::domain::Resolution;

/// Point sequence of one resolution, tagged by which one it is.
#[derive(Debug, Clone, PartialEq)]
pub enum Sampling {
    Rough(Vec<Point3<f64>>),
    Fine(Vec<Point3<f64>>),
}

impl Sampling {
    pub fn resolution(&self) -> Resolution {
        match self {
            Sampling::Rough(_) => Resolution::Rough,
            Sampling::Fine(_) => Resolution::Fine,
        }
    }

    pub fn points(&self) -> &[Point3<f64>] {
        match self {
            Sampling::Rough(p) | Sampling::Fine(p) => p,
        }
    }
}

/// A fiber centerline.
///
/// Identity is the position in the loaded collection. Immutable once built;
/// tangents of the fine resolution are computed at construction.
#[derive(Debug, Clone)]
pub struct Curve {
    rough: Sampling,
    fine: Sampling,
    tangents: Tangents,
}

impl Curve {
    /// Build a curve from simulation points, deriving the fine resolution.
    pub fn from_rough(rough: Vec<Point3<f64>>, fine_points: usize) -> Self {
        let fine = resample_fine(&rough, fine_points);
        Self::new(rough, fine)
    }

    /// Build a curve from explicit point sets.
    pub fn new(rough: Vec<Point3<f64>>, fine: Vec<Point3<f64>>) -> Self {
        let tangents = compute_tangents(&fine, Vector3::z());
        Self {
            rough: Sampling::Rough(rough),
            fine: Sampling::Fine(fine),
            tangents,
        }
    }

    pub fn sampling(&self, resolution: Resolution) -> &Sampling {
        match resolution {
            Resolution::Rough => &self.rough,
            Resolution::Fine => &self.fine,
        }
    }

    pub fn points(&self, resolution: Resolution) -> &[Point3<f64>] {
        self.sampling(resolution).points()
    }

    pub fn num_nodes(&self, resolution: Resolution) -> usize {
        self.points(resolution).len()
    }

    /// Unit tangents of the fine resolution, one per fine point.
    pub fn tangents(&self) -> &Tangents {
        &self.tangents
    }

    /// Mean `y` of the rough points (height; drop-order diagnostic).
    pub fn mean_y(&self) -> f64 {
        let pts = self.points(Resolution::Rough);
        if pts.is_empty() {
            return f64::NAN;
        }
        pts.iter().map(|p| p.y).sum::<f64>() / pts.len() as f64
    }

    pub fn arc_length(&self, resolution: Resolution) -> f64 {
        cumulative_lengths(self.points(resolution))
            .last()
            .copied()
            .unwrap_or(0.0)
    }

    /// Mean and standard deviation of consecutive-point spacing.
    pub fn spacing_stats(&self, resolution: Resolution) -> Option<(f64, f64)> {
        let pts = self.points(resolution);
        if pts.len() < 2 {
            return None;
        }
        let d: Vec<f64> = pts.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
        let n = d.len() as f64;
        let mean = d.iter().sum::<f64>() / n;
        let var = d.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Some((mean, var.sqrt()))
    }
}
