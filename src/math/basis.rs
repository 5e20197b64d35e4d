//! Initial orthonormal basis for frame transport.
//!
//! The first frame of a curve is anchored to a global reference axis:
//!
//! - `a3 = t0` (the first tangent)
//! - `a1 = normalize(ref × t0)`
//! - `a2 = t0 × a1`
//!
//! which gives a right-handed triple (`a1 × a2 = a3`). The cross product is
//! undefined when `t0` is parallel to the reference axis; in that case we fall
//! back to the alternate axis and report it.

use nalgebra::Vector3;

/// Below this norm, `ref × t0` is treated as parallel.
const PARALLEL_EPS: f64 = 1e-9;

/// Global reference axes used for the initial lateral direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceAxes {
    pub primary: Vector3<f64>,
    pub alternate: Vector3<f64>,
}

impl Default for ReferenceAxes {
    fn default() -> Self {
        Self {
            primary: Vector3::z(),
            alternate: Vector3::x(),
        }
    }
}

/// An initial basis plus whether the alternate axis had to be used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub a1: Vector3<f64>,
    pub a2: Vector3<f64>,
    pub a3: Vector3<f64>,
    pub used_alternate: bool,
}

/// Build the initial basis for unit tangent `t0`.
pub fn reference_basis(t0: &Vector3<f64>, axes: &ReferenceAxes) -> Basis {
    let (lateral, used_alternate) = match axes.primary.cross(t0).try_normalize(PARALLEL_EPS) {
        Some(v) => (v, false),
        None => {
            // The alternate axis cannot also be parallel unless the two
            // reference axes are; fall back to any perpendicular direction.
            let v = axes
                .alternate
                .cross(t0)
                .try_normalize(PARALLEL_EPS)
                .unwrap_or_else(|| any_perpendicular(t0));
            (v, true)
        }
    };

    Basis {
        a1: lateral,
        a2: t0.cross(&lateral),
        a3: *t0,
        used_alternate,
    }
}

/// A unit vector perpendicular to `v` (chosen from the least-aligned global axis).
pub fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let ax = v.x.abs();
    let ay = v.y.abs();
    let az = v.z.abs();

    let axis = if ax <= ay && ax <= az {
        Vector3::x()
    } else if ay <= az {
        Vector3::y()
    } else {
        Vector3::z()
    };

    v.cross(&axis).normalize()
}
