//! Sub-strand placement along a fiber.
//!
//! ```text
//! position[m, i]    = centerline[i] + offset[m].x * a1_i + offset[m].y * a2_i
//! orientation[m, i] = a3_i
//! ```

use nalgebra::{Point3, Vector2};

use crate::curve::Curve;
use crate::domain::{Resolution, TransportConfig};
use crate::error::MeshError;
use crate::math::{Degeneracy, Frame, ReferenceAxes, transport};
use crate::strand::cloud::StrandCloud;
use crate::strand::pattern::OffsetPattern;

/// Place every offset at every sample.
///
/// Callers must pass one frame per centerline sample; this is only checked
/// in debug builds (see [`expand_curve`] for the checked driver).
pub fn expand(centerline: &[Point3<f64>], frames: &[Frame], offsets: &[Vector2<f64>]) -> StrandCloud {
    debug_assert_eq!(centerline.len(), frames.len());

    let samples = centerline.len();
    let strands = offsets.len();
    let mut positions = Vec::with_capacity(strands * samples);
    let mut orientations = Vec::with_capacity(strands * samples);

    for o in offsets {
        for (c, f) in centerline.iter().zip(frames) {
            positions.push(*c + f.a1 * o.x + f.a2 * o.y);
            orientations.push(f.a3);
        }
    }

    StrandCloud::from_parts(strands, samples, positions, orientations)
}

/// Sub-strands of one curve plus the fallbacks taken while building frames.
#[derive(Debug, Clone)]
pub struct ExpandedCurve {
    pub cloud: StrandCloud,
    pub degeneracies: Vec<Degeneracy>,
}

/// Transport frames along `curve`'s fine centerline and expand `pattern`.
///
/// `index` is the curve's position in the loaded collection, used for error
/// and log context.
pub fn expand_curve(
    index: usize,
    curve: &Curve,
    pattern: &OffsetPattern,
    axes: &ReferenceAxes,
    config: &TransportConfig,
) -> Result<ExpandedCurve, MeshError> {
    let centerline = curve.points(Resolution::Fine);
    let tangents = curve.tangents();
    let tr = transport(&tangents.vectors, axes, config);

    if tr.frames.len() != centerline.len() {
        return Err(MeshError::ShapeMismatch {
            curve: index,
            centerline: centerline.len(),
            frames: tr.frames.len(),
        });
    }

    let mut degeneracies = tangents.degeneracies.clone();
    degeneracies.extend(tr.degeneracies);
    for d in &degeneracies {
        match d {
            Degeneracy::ZeroLengthSegment { sample } => {
                log::debug!("curve {index}: zero-length segment at sample {sample}, tangent carried forward");
            }
            Degeneracy::ReferenceFallback => {
                log::debug!("curve {index}: first tangent parallel to reference axis, using alternate axis");
            }
            Degeneracy::NoDirection => {
                log::warn!("curve {index}: no segment of positive length, using reference axis as tangent");
            }
        }
    }

    Ok(ExpandedCurve {
        cloud: expand(centerline, &tr.frames, &pattern.offsets),
        degeneracies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strand::pattern::hcp_offsets;
    use nalgebra::Vector3;

    fn straight_z(samples: usize) -> Curve {
        let pts: Vec<_> = (0..samples).map(|i| Point3::new(0.0, 0.0, i as f64)).collect();
        Curve::new(pts.clone(), pts)
    }

    #[test]
    fn shape_is_offsets_by_samples() {
        let curve = Curve::from_rough(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(3.0, 1.0, 0.0),
                Point3::new(5.0, 4.0, 2.0),
            ],
            40,
        );
        let pattern = hcp_offsets(5.0, 1.0).unwrap();
        let out = expand_curve(0, &curve, &pattern, &ReferenceAxes::default(), &TransportConfig::default()).unwrap();
        assert_eq!(out.cloud.shape(), (19, 40, 3));
        assert_eq!(out.cloud.positions().len(), 19 * 40);
        assert_eq!(out.cloud.orientations().len(), 19 * 40);
    }

    #[test]
    fn orientation_is_broadcast_across_offsets() {
        let curve = Curve::from_rough(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 1.0, 1.0),
                Point3::new(3.0, 3.0, 1.0),
            ],
            25,
        );
        let pattern = hcp_offsets(3.0, 1.0).unwrap();
        let out = expand_curve(4, &curve, &pattern, &ReferenceAxes::default(), &TransportConfig::default()).unwrap();
        for i in 0..25 {
            let o0 = out.cloud.orientation(0, i);
            assert_eq!(o0, curve.tangents().vectors[i]);
            for m in 1..pattern.len() {
                assert_eq!(out.cloud.orientation(m, i), o0);
            }
        }
    }

    #[test]
    fn offsets_keep_their_distance_from_centerline() {
        let curve = Curve::from_rough(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 1.0),
                Point3::new(6.0, 3.0, 2.0),
                Point3::new(6.0, 7.0, 2.0),
            ],
            60,
        );
        let pattern = hcp_offsets(5.0, 1.0).unwrap();
        let out = expand_curve(0, &curve, &pattern, &ReferenceAxes::default(), &TransportConfig::default()).unwrap();
        let centerline = curve.points(Resolution::Fine);
        for (m, o) in pattern.offsets.iter().enumerate() {
            for (i, c) in centerline.iter().enumerate() {
                let r = (out.cloud.position(m, i) - c).norm();
                assert!((r - o.norm()).abs() < 1e-9);
                // Offset lies in the cross-section plane.
                let axial = (out.cloud.position(m, i) - c).dot(&out.cloud.orientation(m, i));
                assert!(axial.abs() < 1e-9);
            }
        }
    }

    #[test]
    fn straight_curve_gives_parallel_strands() {
        let curve = straight_z(100);
        let pattern = hcp_offsets(3.0, 1.0).unwrap();
        let out = expand_curve(0, &curve, &pattern, &ReferenceAxes::default(), &TransportConfig::default()).unwrap();
        assert_eq!(out.degeneracies, vec![Degeneracy::ReferenceFallback]);
        for m in 0..pattern.len() {
            let first = out.cloud.position(m, 0);
            for i in 0..100 {
                let p = out.cloud.position(m, i);
                assert_eq!(p.x, first.x);
                assert_eq!(p.y, first.y);
                assert_eq!(p.z, i as f64);
                assert_eq!(out.cloud.orientation(m, i), Vector3::z());
            }
        }
    }

    #[test]
    fn duplicate_sample_keeps_previous_frame() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.2),
            Point3::new(1.0, 0.0, 0.2),
            Point3::new(2.0, 0.5, 0.4),
        ];
        let curve = Curve::new(pts.clone(), pts);
        let tr = transport(&curve.tangents().vectors, &ReferenceAxes::default(), &TransportConfig::default());
        assert_eq!(tr.frames[1], tr.frames[0]);

        let pattern = hcp_offsets(3.0, 1.0).unwrap();
        let out = expand_curve(0, &curve, &pattern, &ReferenceAxes::default(), &TransportConfig::default()).unwrap();
        assert!(out.degeneracies.contains(&Degeneracy::ZeroLengthSegment { sample: 1 }));
        for m in 0..pattern.len() {
            for i in 0..4 {
                assert!(out.cloud.position(m, i).iter().all(|c| c.is_finite()));
            }
        }
    }
}
