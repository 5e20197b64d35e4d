//! Sub-strand point clouds, per curve and aggregated.

use nalgebra::{Point3, Vector3};

use crate::error::MeshError;
use crate::io::array::Matrix;
use crate::neighbor::PackedPoints;

/// Positions and orientations of one curve's sub-strands.
///
/// Logical shape `(strands, samples, 3)`, stored strand-major.
#[derive(Debug, Clone, PartialEq)]
pub struct StrandCloud {
    strands: usize,
    samples: usize,
    positions: Vec<Point3<f64>>,
    orientations: Vec<Vector3<f64>>,
}

impl StrandCloud {
    pub fn from_parts(
        strands: usize,
        samples: usize,
        positions: Vec<Point3<f64>>,
        orientations: Vec<Vector3<f64>>,
    ) -> Self {
        debug_assert_eq!(positions.len(), strands * samples);
        debug_assert_eq!(orientations.len(), strands * samples);
        Self {
            strands,
            samples,
            positions,
            orientations,
        }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.strands, self.samples, 3)
    }

    pub fn strands(&self) -> usize {
        self.strands
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn position(&self, strand: usize, sample: usize) -> Point3<f64> {
        self.positions[strand * self.samples + sample]
    }

    pub fn orientation(&self, strand: usize, sample: usize) -> Vector3<f64> {
        self.orientations[strand * self.samples + sample]
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn orientations(&self) -> &[Vector3<f64>] {
        &self.orientations
    }

    /// All sample positions of one strand.
    pub fn strand(&self, strand: usize) -> &[Point3<f64>] {
        &self.positions[strand * self.samples..(strand + 1) * self.samples]
    }
}

/// Which per-point quantity to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Position,
    Orientation,
}

impl Field {
    pub fn file_stem(self) -> &'static str {
        match self {
            Field::Position => "pos",
            Field::Orientation => "orient",
        }
    }
}

/// All curves' sub-strands, in curve order.
#[derive(Debug, Clone, Default)]
pub struct StrandSet {
    clouds: Vec<StrandCloud>,
}

impl StrandSet {
    pub fn push(&mut self, cloud: StrandCloud) {
        self.clouds.push(cloud);
    }

    pub fn clouds(&self) -> &[StrandCloud] {
        &self.clouds
    }

    pub fn total_strands(&self) -> usize {
        self.clouds.iter().map(StrandCloud::strands).sum()
    }

    /// Common sample count; matrix outputs need every curve to agree.
    pub fn samples(&self) -> Result<usize, MeshError> {
        let Some(first) = self.clouds.first() else {
            return Ok(0);
        };
        for (curve, c) in self.clouds.iter().enumerate() {
            if c.samples() != first.samples() {
                return Err(MeshError::RaggedSamples {
                    curve,
                    samples: c.samples(),
                    expected: first.samples(),
                });
            }
        }
        Ok(first.samples())
    }

    /// One coordinate (`axis` 0..3) of `field` as a `(total strands, samples)` matrix.
    pub fn component(&self, field: Field, axis: usize) -> Result<Matrix, MeshError> {
        let samples = self.samples()?;
        let rows = self.total_strands();
        let mut data = Vec::with_capacity(rows * samples);
        for cloud in &self.clouds {
            match field {
                Field::Position => data.extend(cloud.positions().iter().map(|p| p[axis])),
                Field::Orientation => data.extend(cloud.orientations().iter().map(|v| v[axis])),
            }
        }
        Ok(Matrix::new(rows, samples, data))
    }

    /// Every strand's positions packed for distance scans.
    pub fn packed_strands(&self) -> Vec<PackedPoints> {
        self.clouds
            .iter()
            .flat_map(|c| (0..c.strands()).map(move |m| PackedPoints::from_points(c.strand(m))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud(strands: usize, samples: usize, base: f64) -> StrandCloud {
        let mut positions = Vec::new();
        let mut orientations = Vec::new();
        for m in 0..strands {
            for i in 0..samples {
                positions.push(Point3::new(base + m as f64, i as f64, 0.0));
                orientations.push(Vector3::y());
            }
        }
        StrandCloud::from_parts(strands, samples, positions, orientations)
    }

    #[test]
    fn indexing_is_strand_major() {
        let c = cloud(2, 3, 0.0);
        assert_eq!(c.shape(), (2, 3, 3));
        assert_eq!(c.position(1, 2), Point3::new(1.0, 2.0, 0.0));
        assert_eq!(c.strand(1).len(), 3);
        assert_eq!(c.strand(1)[0], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn component_matrix_concatenates_curves() {
        let mut set = StrandSet::default();
        set.push(cloud(2, 3, 0.0));
        set.push(cloud(3, 3, 10.0));
        assert_eq!(set.total_strands(), 5);
        let x = set.component(Field::Position, 0).unwrap();
        assert_eq!((x.rows(), x.cols()), (5, 3));
        assert_eq!(x.row(2), &[10.0, 10.0, 10.0]);
        let oy = set.component(Field::Orientation, 1).unwrap();
        assert!(oy.data().iter().all(|&v| v == 1.0));
        assert_eq!(set.packed_strands().len(), 5);
    }

    #[test]
    fn ragged_sample_counts_are_rejected() {
        let mut set = StrandSet::default();
        set.push(cloud(1, 3, 0.0));
        set.push(cloud(1, 4, 0.0));
        assert!(matches!(
            set.component(Field::Position, 0),
            Err(MeshError::RaggedSamples {
                curve: 1,
                samples: 4,
                expected: 3
            })
        ));
    }
}
