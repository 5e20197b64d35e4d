//! Seeded synthetic fiber mesh.
//!
//! Fibers are dropped one after another onto a square area: each one is a
//! random walk of fixed-length sections in the horizontal `x`/`z` plane whose
//! heading bends by a normally distributed angle per section. Successive drops
//! sit `layer_height` higher, so the per-fiber mean `y` grows with drop order.
//! Output files use the loader's `tube{i}.pos.dat` record format.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use nalgebra::Point3;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::SynthConfig;
use crate::error::MeshError;
use crate::io::ingest::tube_file_name;

/// Small vertical jitter relative to `layer_height`.
const Y_JITTER: f64 = 0.05;

fn validate(config: &SynthConfig) -> Result<(), MeshError> {
    if config.files == 0 || config.fibers_per_file == 0 {
        return Err(MeshError::InvalidConfig("synthetic mesh needs at least one file and one fiber".to_string()));
    }
    if config.files >= 100 {
        return Err(MeshError::InvalidConfig(format!(
            "at most 99 files are read back by the loader (got {})",
            config.files
        )));
    }
    if config.sections < 2 {
        return Err(MeshError::InvalidConfig("each fiber needs at least 2 sections".to_string()));
    }
    let positive = [config.section_length, config.half_extent, config.layer_height];
    if positive.iter().any(|v| !(v.is_finite() && *v > 0.0)) {
        return Err(MeshError::InvalidConfig(
            "section length, half extent and layer height must be > 0".to_string(),
        ));
    }
    if !(config.bend_sigma.is_finite() && config.bend_sigma >= 0.0) {
        return Err(MeshError::InvalidConfig("bend sigma must be >= 0".to_string()));
    }
    Ok(())
}

/// Generate every fiber, grouped by output file.
pub fn generate_fibers(config: &SynthConfig) -> Result<Vec<Vec<Vec<Point3<f64>>>>, MeshError> {
    validate(config)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let bend = Normal::new(0.0, config.bend_sigma)
        .map_err(|e| MeshError::InvalidConfig(format!("bend distribution: {e}")))?;
    let jitter = Normal::new(0.0, Y_JITTER * config.layer_height)
        .map_err(|e| MeshError::InvalidConfig(format!("jitter distribution: {e}")))?;

    let h = config.half_extent;
    let mut drop = 0usize;
    let mut files = Vec::with_capacity(config.files);
    for _ in 0..config.files {
        let mut fibers = Vec::with_capacity(config.fibers_per_file);
        for _ in 0..config.fibers_per_file {
            drop += 1;
            let y = config.layer_height * drop as f64;
            let mut p = Point3::new(rng.gen_range(-h..=h), y, rng.gen_range(-h..=h));
            let mut heading: f64 = rng.gen_range(0.0..std::f64::consts::TAU);

            let mut points = Vec::with_capacity(config.sections);
            points.push(p);
            for _ in 1..config.sections {
                heading += bend.sample(&mut rng);
                p = Point3::new(
                    p.x + config.section_length * heading.cos(),
                    y + jitter.sample(&mut rng),
                    p.z + config.section_length * heading.sin(),
                );
                points.push(p);
            }
            fibers.push(points);
        }
        files.push(fibers);
    }
    Ok(files)
}

/// One loader-compatible record.
pub fn format_curve_line(index: usize, points: &[Point3<f64>]) -> String {
    let mut line = format!("{index};");
    for p in points {
        let _ = write!(line, " {:.6},{:.6},{:.6};", p.x, p.y, p.z);
    }
    line
}

/// Write `tube1.pos.dat ..` into `config.output_dir`; returns the files written.
pub fn write_synthetic_mesh(config: &SynthConfig) -> Result<Vec<PathBuf>, MeshError> {
    let files = generate_fibers(config)?;
    fs::create_dir_all(&config.output_dir).map_err(|e| MeshError::io(&config.output_dir, e))?;

    let mut written = Vec::with_capacity(files.len());
    for (f, fibers) in files.iter().enumerate() {
        let path = config.output_dir.join(tube_file_name(f + 1));
        let mut text = String::new();
        for (k, points) in fibers.iter().enumerate() {
            text.push_str(&format_curve_line(k, points));
            text.push('\n');
        }
        fs::write(&path, text).map_err(|e| MeshError::io(&path, e))?;
        log::debug!("wrote {} fibers to {}", fibers.len(), path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_curve_records;

    fn config() -> SynthConfig {
        SynthConfig {
            output_dir: std::env::temp_dir(),
            files: 2,
            fibers_per_file: 3,
            sections: 12,
            section_length: 1.5,
            half_extent: 20.0,
            bend_sigma: 0.2,
            layer_height: 1.0,
            seed: 7,
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_fibers(&config()).unwrap();
        let b = generate_fibers(&config()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert!(a.iter().all(|f| f.len() == 3));
        assert!(a.iter().flatten().all(|pts| pts.len() == 12));
    }

    #[test]
    fn sections_have_requested_horizontal_length() {
        let files = generate_fibers(&config()).unwrap();
        for pts in files.iter().flatten() {
            for w in pts.windows(2) {
                let dx = w[1].x - w[0].x;
                let dz = w[1].z - w[0].z;
                assert!(((dx * dx + dz * dz).sqrt() - 1.5).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn later_drops_sit_higher() {
        let files = generate_fibers(&config()).unwrap();
        let means: Vec<f64> = files
            .iter()
            .flatten()
            .map(|pts| pts.iter().map(|p| p.y).sum::<f64>() / pts.len() as f64)
            .collect();
        assert!(means.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn records_parse_back() {
        let pts = vec![Point3::new(1.0, -2.0, 0.25), Point3::new(3.5, 0.0, 1e-3)];
        let line = format_curve_line(4, &pts);
        assert_eq!(line, "4; 1.000000,-2.000000,0.250000; 3.500000,0.000000,0.001000;");
        let back = read_curve_records(line.as_bytes(), std::path::Path::new("tube1.pos.dat")).unwrap();
        assert_eq!(back, vec![pts]);
    }

    #[test]
    fn rejects_degenerate_settings() {
        let mut c = config();
        c.sections = 1;
        assert!(generate_fibers(&c).is_err());
        let mut c = config();
        c.files = 100;
        assert!(generate_fibers(&c).is_err());
    }
}
