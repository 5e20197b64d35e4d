//! Unit tangents, one per curve sample.
//!
//! Tangent `i` is the direction of segment `(p_i, p_{i+1})`; the last sample
//! reuses the final segment's direction, so the count always matches the
//! number of points. Zero-length segments (duplicate consecutive points) carry
//! the previous tangent forward; leading zero-length segments take the first
//! non-degenerate direction. A curve with no segment of positive length gets
//! the `fallback` direction everywhere.

use nalgebra::{Point3, Vector3};

use crate::math::Degeneracy;

/// Tangents plus any degenerate segments encountered.
#[derive(Debug, Clone)]
pub struct Tangents {
    pub vectors: Vec<Vector3<f64>>,
    pub degeneracies: Vec<Degeneracy>,
}

pub fn compute_tangents(points: &[Point3<f64>], fallback: Vector3<f64>) -> Tangents {
    let n = points.len();
    let mut degeneracies = Vec::new();

    // Segment directions; None for zero-length segments.
    let segments: Vec<Option<Vector3<f64>>> = points
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let d = w[1] - w[0];
            let norm = d.norm();
            if norm > 0.0 {
                Some(d / norm)
            } else {
                degeneracies.push(Degeneracy::ZeroLengthSegment { sample: i });
                None
            }
        })
        .collect();

    let Some(first_dir) = segments.iter().flatten().next().copied() else {
        if n > 1 {
            degeneracies.push(Degeneracy::NoDirection);
        }
        return Tangents {
            vectors: vec![fallback; n],
            degeneracies,
        };
    };

    let mut vectors = Vec::with_capacity(n);
    let mut current = first_dir;
    for seg in &segments {
        if let Some(d) = seg {
            current = *d;
        }
        vectors.push(current);
    }
    // Last sample reuses the final segment's direction.
    if n > 0 {
        vectors.push(current);
    }

    Tangents { vectors, degeneracies }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_tangent_per_sample() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
        ];
        let t = compute_tangents(&pts, Vector3::z());
        assert_eq!(t.vectors.len(), 3);
        assert_eq!(t.vectors[0], Vector3::x());
        assert_eq!(t.vectors[1], Vector3::y());
        assert_eq!(t.vectors[2], Vector3::y());
        assert!(t.degeneracies.is_empty());
    }

    #[test]
    fn duplicate_point_reuses_previous_tangent() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let t = compute_tangents(&pts, Vector3::z());
        assert_eq!(t.vectors.len(), 4);
        assert_eq!(t.vectors[1], t.vectors[0]);
        assert_eq!(t.vectors[2], Vector3::y());
        assert_eq!(t.degeneracies, vec![Degeneracy::ZeroLengthSegment { sample: 1 }]);
    }

    #[test]
    fn leading_duplicate_takes_first_real_direction() {
        let pts = vec![
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 1.0, 1.0),
        ];
        let t = compute_tangents(&pts, Vector3::z());
        assert!(t.vectors.iter().all(|v| *v == Vector3::x()));
    }

    #[test]
    fn degenerate_curves_use_fallback() {
        let single = compute_tangents(&[Point3::origin()], Vector3::z());
        assert_eq!(single.vectors, vec![Vector3::z()]);
        assert!(single.degeneracies.is_empty());

        let collapsed = compute_tangents(&[Point3::origin(); 3], Vector3::z());
        assert_eq!(collapsed.vectors, vec![Vector3::z(); 3]);
        assert!(collapsed.degeneracies.contains(&Degeneracy::NoDirection));
    }
}
