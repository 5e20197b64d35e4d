//! Brute-force minimum distance between two point sets.
//!
//! Points are packed once into structure-of-arrays buffers so the inner loop
//! is a straight run over contiguous `f64`s. We compare squared distances and
//! take a single square root per pair of curves.

use nalgebra::Point3;

/// Coordinates of one point set in three contiguous buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedPoints {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl PackedPoints {
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let mut out = Self {
            x: Vec::with_capacity(points.len()),
            y: Vec::with_capacity(points.len()),
            z: Vec::with_capacity(points.len()),
        };
        for p in points {
            out.x.push(p.x);
            out.y.push(p.y);
            out.z.push(p.z);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Minimum squared distance over all point pairs, starting from `init`.
fn min_sq_distance(a: &PackedPoints, b: &PackedPoints, init: f64) -> f64 {
    let mut best = init;
    for i in 0..a.len() {
        let (px, py, pz) = (a.x[i], a.y[i], a.z[i]);
        for ((qx, qy), qz) in b.x.iter().zip(&b.y).zip(&b.z) {
            let dx = px - qx;
            let dy = py - qy;
            let dz = pz - qz;
            let d2 = dx * dx + dy * dy + dz * dz;
            if d2 < best {
                best = d2;
            }
        }
    }
    best
}

/// Minimum Euclidean distance between any point of `a` and any point of `b`.
///
/// Returns `f64::INFINITY` if either set is empty.
pub fn min_distance(a: &PackedPoints, b: &PackedPoints) -> f64 {
    min_sq_distance(a, b, f64::INFINITY).sqrt()
}

/// Like [`min_distance`] but never larger than `cap`.
///
/// Pairs farther apart than `cap` report `cap`, matching a scan whose running
/// minimum starts at `cap`.
pub fn min_distance_capped(a: &PackedPoints, b: &PackedPoints, cap: f64) -> f64 {
    min_sq_distance(a, b, cap * cap).sqrt()
}
