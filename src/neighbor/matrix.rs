//! Distance matrix over a bounded population of curves.
//!
//! `M[i, j]` is the minimum point distance between curves `i` and `j`;
//! the diagonal holds the sentinel `-1` and never enters any statistic.
//! Rows are independent, so the upper triangle is computed row-by-row
//! (optionally in parallel) and mirrored.

use rayon::prelude::*;

use crate::curve::Curve;
use crate::domain::Resolution;
use crate::neighbor::distance::{PackedPoints, min_distance};

/// Diagonal marker: "distance to self", excluded from statistics.
pub const SENTINEL: f64 = -1.0;

/// Dense symmetric `n × n` matrix stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Rows as slices (for matrix exports).
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.n.max(1)).take(self.n)
    }

    /// Each unordered pair `i < j` once.
    pub fn pair_values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.n).flat_map(move |i| ((i + 1)..self.n).map(move |j| self.get(i, j)))
    }

    /// Nearest-neighbor distance per curve (row minimum, sentinel excluded).
    ///
    /// `None` when the curve has no other curve to compare with.
    pub fn nearest_neighbors(&self) -> Vec<Option<f64>> {
        (0..self.n)
            .map(|i| {
                self.row(i)
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, &d)| d)
                    .reduce(f64::min)
            })
            .collect()
    }

    /// Index of the nearest neighbor per curve (ties go to the lower index).
    pub fn nearest_indices(&self) -> Vec<Option<usize>> {
        (0..self.n)
            .map(|i| {
                let mut best: Option<(usize, f64)> = None;
                for (j, &d) in self.row(i).iter().enumerate() {
                    if j == i {
                        continue;
                    }
                    if best.is_none_or(|(_, b)| d < b) {
                        best = Some((j, d));
                    }
                }
                best.map(|(j, _)| j)
            })
            .collect()
    }
}

/// Build the distance matrix for the first `limit` curves at `resolution`.
pub fn distance_matrix(
    curves: &[Curve],
    resolution: Resolution,
    limit: usize,
    parallel: bool,
) -> DistanceMatrix {
    let sets: Vec<PackedPoints> = curves
        .iter()
        .take(limit)
        .map(|c| PackedPoints::from_points(c.points(resolution)))
        .collect();
    distance_matrix_from_sets(&sets, parallel)
}

/// Build the distance matrix for pre-packed point sets.
pub fn distance_matrix_from_sets(sets: &[PackedPoints], parallel: bool) -> DistanceMatrix {
    let n = sets.len();

    let upper_row = |i: usize| -> Vec<f64> {
        log::trace!("distance row {i}/{n}");
        ((i + 1)..n).map(|j| min_distance(&sets[i], &sets[j])).collect()
    };

    let upper: Vec<Vec<f64>> = if parallel {
        (0..n).into_par_iter().map(upper_row).collect()
    } else {
        (0..n).map(upper_row).collect()
    };

    let mut values = vec![SENTINEL; n * n];
    for (i, row) in upper.into_iter().enumerate() {
        for (offset, d) in row.into_iter().enumerate() {
            let j = i + 1 + offset;
            values[i * n + j] = d;
            values[j * n + i] = d;
        }
    }

    DistanceMatrix { n, values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn sets() -> Vec<PackedPoints> {
        let raw: Vec<Vec<Point3<f64>>> = vec![
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            vec![Point3::new(0.0, 3.0, 0.0), Point3::new(1.0, 2.0, 0.0)],
            vec![Point3::new(9.0, 9.0, 9.0)],
            vec![Point3::new(1.0, 0.0, 0.5), Point3::new(5.0, 5.0, 5.0)],
        ];
        raw.iter().map(|p| PackedPoints::from_points(p)).collect()
    }

    #[test]
    fn matrix_is_symmetric_with_sentinel_diagonal() {
        let s = sets();
        let m = distance_matrix_from_sets(&s, false);
        assert_eq!(m.len(), 4);
        for i in 0..4 {
            assert_eq!(m.get(i, i), SENTINEL);
            for j in 0..4 {
                if i != j {
                    assert_eq!(m.get(i, j), m.get(j, i));
                    assert_eq!(m.get(i, j), min_distance(&s[i], &s[j]));
                }
            }
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let s = sets();
        assert_eq!(
            distance_matrix_from_sets(&s, true),
            distance_matrix_from_sets(&s, false)
        );
    }

    #[test]
    fn nearest_neighbors_skip_sentinel() {
        let m = distance_matrix_from_sets(&sets(), false);
        let nn = m.nearest_neighbors();
        assert_eq!(nn[0], Some(0.5));
        assert_eq!(nn[3], Some(0.5));
        assert_eq!(nn[1], Some(2.0));
        assert!(nn.iter().flatten().all(|&d| d >= 0.0));

        let idx = m.nearest_indices();
        assert_eq!(idx[0], Some(3));
        assert_eq!(idx[3], Some(0));
        assert_eq!(idx[1], Some(0));
    }

    #[test]
    fn pair_values_exclude_diagonal() {
        let m = distance_matrix_from_sets(&sets(), false);
        let pairs: Vec<f64> = m.pair_values().collect();
        assert_eq!(pairs.len(), 6);
        assert!(pairs.iter().all(|&d| d != SENTINEL));
    }

    #[test]
    fn single_curve_has_no_neighbor() {
        let m = distance_matrix_from_sets(&sets()[..1], false);
        assert_eq!(m.nearest_neighbors(), vec![None]);
        assert_eq!(m.get(0, 0), SENTINEL);
        assert_eq!(m.pair_values().count(), 0);
    }
}
