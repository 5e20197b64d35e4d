//! Cross-sectional sub-strand layout.
//!
//! Sub-strands of diameter `d` are packed on a hexagonal lattice of spacing
//! `d` centered on the fiber axis. A lattice site is kept when its whole disk
//! fits inside the fiber's circle of diameter `D`: `|c| + d/2 <= D/2`.
//! Sites are ordered center first, then ring by ring, counter-clockwise from
//! the +a1 direction.

use nalgebra::Vector2;

use crate::error::MeshError;

/// Slack on the containment test so sites exactly on the boundary are kept.
const FIT_TOL: f64 = 1e-9;

/// Fixed 2-D offsets shared by every fiber of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetPattern {
    pub fiber_diameter: f64,
    pub strand_diameter: f64,
    pub offsets: Vec<Vector2<f64>>,
}

impl OffsetPattern {
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Hexagonal close-packed offsets for a fiber of `fiber_diameter` filled with
/// sub-strands of `strand_diameter`.
pub fn hcp_offsets(fiber_diameter: f64, strand_diameter: f64) -> Result<OffsetPattern, MeshError> {
    if !(fiber_diameter.is_finite() && strand_diameter.is_finite()) || strand_diameter <= 0.0 {
        return Err(MeshError::InvalidConfig(format!(
            "sub-strand diameter must be finite and > 0 (got {strand_diameter})"
        )));
    }
    if strand_diameter > fiber_diameter + FIT_TOL {
        return Err(MeshError::InvalidConfig(format!(
            "sub-strand diameter {strand_diameter} exceeds fiber diameter {fiber_diameter}"
        )));
    }

    let a = strand_diameter;
    let limit = 0.5 * (fiber_diameter - strand_diameter) + FIT_TOL;
    let row_height = a * 3f64.sqrt() / 2.0;
    let reach = (limit / row_height).ceil() as i64 + 1;

    let mut sites = Vec::new();
    for j in -reach..=reach {
        for i in -2 * reach..=2 * reach {
            let c = Vector2::new(a * (i as f64 + 0.5 * j as f64), row_height * j as f64);
            if c.norm() <= limit {
                sites.push(c);
            }
        }
    }

    sites.sort_by(|p, q| {
        ring_key(p, a)
            .cmp(&ring_key(q, a))
            .then(angle(p).total_cmp(&angle(q)))
    });

    Ok(OffsetPattern {
        fiber_diameter,
        strand_diameter,
        offsets: sites,
    })
}

fn ring_key(p: &Vector2<f64>, a: f64) -> i64 {
    (p.norm() / a * 1e6).round() as i64
}

fn angle(p: &Vector2<f64>) -> f64 {
    if p.norm() == 0.0 {
        return 0.0;
    }
    p.y.atan2(p.x).rem_euclid(std::f64::consts::TAU)
}
