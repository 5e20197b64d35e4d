//! Frame transport along a sampled curve.
//!
//! Each curve sample carries a local frame `(a1, a2, a3)` with `a3` equal to
//! the tangent. Going from sample `i-1` to `i` we rotate the lateral axes by
//! the minimal rotation that carries the previous axial direction onto the
//! new tangent:
//!
//! ```text
//! axis  = a3_prev × t_i
//! angle = asin(|axis|)          (π - asin(|axis|) for obtuse turns)
//! a1    = q(axis, angle) · a1_prev
//! a2    = q(axis, angle) · a2_prev
//! a3    = t_i                   (assigned, not rotated)
//! ```
//!
//! Assigning `a3` instead of rotating it keeps the axial direction exact; the
//! lateral axes are not renormalized unless `TransportConfig` asks for it.

use std::f64::consts::PI;

use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::domain::TransportConfig;
use crate::math::basis::{ReferenceAxes, reference_basis};

/// Rotation axes shorter than this are treated as "no turn".
const IDENTITY_EPS: f64 = 1e-14;

/// Obtuse turns with `|a3_prev × t|` below this are treated as exact reversals.
///
/// Near a half turn the cross product is dominated by rounding noise, so its
/// direction cannot be trusted; the reversal rule is off by at most this much.
const REVERSAL_EPS: f64 = 1e-8;

/// Orthonormal frame attached to one curve sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// First lateral axis.
    pub a1: Vector3<f64>,
    /// Second lateral axis.
    pub a2: Vector3<f64>,
    /// Axial direction (the tangent at this sample).
    pub a3: Vector3<f64>,
}

/// A geometric degeneracy handled by a fallback rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// First tangent parallel to the primary reference axis.
    ReferenceFallback,
    /// Zero-length segment starting at `sample`; the neighboring tangent was reused.
    ZeroLengthSegment { sample: usize },
    /// Curve has no segment of positive length; tangents default to the reference axis.
    NoDirection,
}

/// Frames for every sample plus any fallbacks taken on the way.
#[derive(Debug, Clone)]
pub struct Transport {
    pub frames: Vec<Frame>,
    pub degeneracies: Vec<Degeneracy>,
}

impl Frame {
    /// Advance this frame to the next unit tangent.
    pub fn step(&self, tangent: &Vector3<f64>) -> Frame {
        let axis = self.a3.cross(tangent);
        let sin = axis.norm();
        let cos = self.a3.dot(tangent);

        if sin <= IDENTITY_EPS && cos >= 0.0 {
            return Frame {
                a1: self.a1,
                a2: self.a2,
                a3: *tangent,
            };
        }
        if sin <= REVERSAL_EPS && cos < 0.0 {
            // Reversal: half turn about a1.
            return Frame {
                a1: self.a1,
                a2: -self.a2,
                a3: *tangent,
            };
        }

        // The rotation axis must be perpendicular to a3_prev for the turn to land on t.
        let axis = axis - self.a3 * axis.dot(&self.a3);
        let Some(axis) = Unit::try_new(axis, IDENTITY_EPS) else {
            return Frame {
                a1: self.a1,
                a2: self.a2,
                a3: *tangent,
            };
        };

        // Clamp guards asin against |axis| drifting above 1 for near-parallel unit vectors.
        let mut angle = sin.min(1.0).asin();
        if cos < 0.0 {
            angle = PI - angle;
        }
        let rot = UnitQuaternion::from_axis_angle(&axis, angle);

        Frame {
            a1: rot * self.a1,
            a2: rot * self.a2,
            a3: *tangent,
        }
    }

    /// Gram–Schmidt the lateral axes against `a3`.
    pub fn orthonormalized(&self) -> Frame {
        let a1 = self.a1 - self.a3 * self.a1.dot(&self.a3);
        let a1 = a1.try_normalize(IDENTITY_EPS).unwrap_or(self.a1);
        Frame {
            a1,
            a2: self.a3.cross(&a1),
            a3: self.a3,
        }
    }

    /// Largest deviation from orthonormality (norms and pairwise dots).
    pub fn orthonormality_error(&self) -> f64 {
        let norms = [self.a1.norm(), self.a2.norm(), self.a3.norm()]
            .into_iter()
            .map(|n| (n - 1.0).abs());
        let dots = [
            self.a1.dot(&self.a2),
            self.a1.dot(&self.a3),
            self.a2.dot(&self.a3),
        ]
        .into_iter()
        .map(f64::abs);
        norms.chain(dots).fold(0.0, f64::max)
    }
}

/// Transport a frame along `tangents` (unit vectors, one per sample).
///
/// The first frame is the reference basis built from `tangents[0]`; each
/// subsequent frame is `previous.step(t_i)`.
pub fn transport(tangents: &[Vector3<f64>], axes: &ReferenceAxes, config: &TransportConfig) -> Transport {
    let Some(first) = tangents.first() else {
        return Transport {
            frames: Vec::new(),
            degeneracies: Vec::new(),
        };
    };

    let mut degeneracies = Vec::new();
    let basis = reference_basis(first, axes);
    if basis.used_alternate {
        degeneracies.push(Degeneracy::ReferenceFallback);
    }

    let start = Frame {
        a1: basis.a1,
        a2: basis.a2,
        a3: basis.a3,
    };

    let renormalize_every = config.renormalize_every.filter(|&n| n > 0);

    let mut frames = Vec::with_capacity(tangents.len());
    frames.push(start);
    frames.extend(tangents.iter().enumerate().skip(1).scan(start, |prev, (i, t)| {
        let mut next = prev.step(t);
        if renormalize_every.is_some_and(|n| i % n == 0) {
            next = next.orthonormalized();
        }
        *prev = next;
        Some(next)
    }));

    Transport { frames, degeneracies }
}
