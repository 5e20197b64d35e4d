//! Fine-resolution resampling of a rough polyline.
//!
//! Two passes:
//!
//! 1. densify with a uniform Catmull–Rom spline (end tangents from reflected
//!    phantom points, so straight input stays on its line)
//! 2. pick `count` points at equal arc-length spacing along the dense polyline
//!
//! The first and last fine points are the rough endpoints exactly.

use nalgebra::Point3;

/// Spline evaluations per rough segment.
const SUBDIVISIONS: usize = 16;

/// Resample `rough` to exactly `count` points (`count >= 2`).
pub fn resample_fine(rough: &[Point3<f64>], count: usize) -> Vec<Point3<f64>> {
    let count = count.max(2);
    match rough.len() {
        0 => Vec::new(),
        1 => vec![rough[0]; count],
        _ => {
            let dense = catmull_rom_dense(rough, SUBDIVISIONS);
            sample_arc_length(&dense, count)
        }
    }
}

/// Evaluate a uniform Catmull–Rom spline through `points`.
pub fn catmull_rom_dense(points: &[Point3<f64>], subdivisions: usize) -> Vec<Point3<f64>> {
    let n = points.len();
    if n < 2 {
        return points.to_vec();
    }
    let subdivisions = subdivisions.max(1);

    let get = |i: isize| -> Point3<f64> {
        if i < 0 {
            // Reflect the first segment.
            points[0] + (points[0] - points[1])
        } else if i as usize >= n {
            points[n - 1] + (points[n - 1] - points[n - 2])
        } else {
            points[i as usize]
        }
    };

    let mut out = Vec::with_capacity((n - 1) * subdivisions + 1);
    for seg in 0..n - 1 {
        let i = seg as isize;
        let p0 = get(i - 1).coords;
        let p1 = get(i).coords;
        let p2 = get(i + 1).coords;
        let p3 = get(i + 2).coords;

        for k in 0..subdivisions {
            if k == 0 {
                out.push(points[seg]);
                continue;
            }
            let t = k as f64 / subdivisions as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            let v = (p1 * 2.0
                + (p2 - p0) * t
                + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
                + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
                * 0.5;
            out.push(Point3::from(v));
        }
    }
    out.push(points[n - 1]);
    out
}

/// Pick `count` points at equal arc-length spacing along a polyline.
pub fn sample_arc_length(points: &[Point3<f64>], count: usize) -> Vec<Point3<f64>> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }
    let count = count.max(2);

    let cumulative = cumulative_lengths(points);
    let total = cumulative[n - 1];
    if total <= 0.0 {
        return vec![points[0]; count];
    }

    let mut out = Vec::with_capacity(count);
    out.push(points[0]);

    let mut seg = 0usize;
    for k in 1..count - 1 {
        let target = total * k as f64 / (count - 1) as f64;
        while seg + 1 < n - 1 && cumulative[seg + 1] < target {
            seg += 1;
        }
        let seg_len = cumulative[seg + 1] - cumulative[seg];
        let local = if seg_len > 0.0 {
            ((target - cumulative[seg]) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(points[seg] + (points[seg + 1] - points[seg]) * local);
    }

    out.push(points[n - 1]);
    out
}

/// Running arc length at each vertex (first entry 0).
pub fn cumulative_lengths(points: &[Point3<f64>]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    if !points.is_empty() {
        cumulative.push(0.0);
    }
    for w in points.windows(2) {
        total += (w[1] - w[0]).norm();
        cumulative.push(total);
    }
    cumulative
}
