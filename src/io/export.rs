//! Result exports.
//!
//! - Armadillo-compatible text matrices (`ARMA_MAT_TXT_FN008` header, a
//!   free-text metadata line, then rows of `%+.4e` values)
//! - CSV tables for per-curve nearest neighbors and histograms
//! - the six `single_cnt.{pos,orient}.{x,y,z}` sub-strand matrices

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::ExportFormat;
use crate::error::MeshError;
use crate::io::array::Matrix;
use crate::io::npy::write_npy;
use crate::neighbor::{DistanceMatrix, Histogram};
use crate::strand::{Field, StrandSet};

pub const ARMA_MAGIC: &str = "ARMA_MAT_TXT_FN008";

/// C `printf("%+.4e")`: explicit sign, 4 decimals, signed two-digit exponent.
pub fn format_sci(v: f64) -> String {
    if v.is_nan() {
        return "+nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+inf" } else { "-inf" }.to_string();
    }
    let s = format!("{v:+.4e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => s,
    }
}

pub fn write_arma_text_to(mut w: impl Write, matrix: &Matrix, metadata: &str) -> std::io::Result<()> {
    writeln!(w, "{ARMA_MAGIC}")?;
    writeln!(w, "{} {}", matrix.rows(), matrix.cols())?;
    writeln!(w, "{}", metadata.replace('\n', " "))?;
    for row in matrix.iter_rows() {
        let line: Vec<String> = row.iter().map(|&v| format_sci(v)).collect();
        writeln!(w, "{}", line.join(" "))?;
    }
    w.flush()
}

pub fn write_arma_text(path: &Path, matrix: &Matrix, metadata: &str) -> Result<(), MeshError> {
    let file = File::create(path).map_err(|e| MeshError::io(path, e))?;
    write_arma_text_to(BufWriter::new(file), matrix, metadata).map_err(|e| MeshError::io(path, e))
}

/// Write the sub-strand matrices into `dir`; returns the files written.
///
/// Text files are `single_cnt.<field>.<axis>.dat`, binary ones the same stem
/// with `.npy`.
pub fn write_strand_exports(
    dir: &Path,
    strands: &StrandSet,
    format: ExportFormat,
    metadata: &str,
) -> Result<Vec<PathBuf>, MeshError> {
    std::fs::create_dir_all(dir).map_err(|e| MeshError::io(dir, e))?;

    let mut written = Vec::new();
    for field in [Field::Position, Field::Orientation] {
        for (axis, name) in ["x", "y", "z"].into_iter().enumerate() {
            let matrix = strands.component(field, axis)?;
            let stem = format!("single_cnt.{}.{name}", field.file_stem());
            if format.text() {
                let path = dir.join(format!("{stem}.dat"));
                write_arma_text(&path, &matrix, metadata)?;
                written.push(path);
            }
            if format.npy() {
                let path = dir.join(format!("{stem}.npy"));
                write_npy(&path, &matrix)?;
                written.push(path);
            }
        }
    }
    Ok(written)
}

pub fn write_distance_matrix(path: &Path, matrix: &DistanceMatrix, metadata: &str) -> Result<(), MeshError> {
    let n = matrix.len();
    let data: Vec<f64> = matrix.rows().flatten().copied().collect();
    write_arma_text(path, &Matrix::new(n, n, data), metadata)
}

#[derive(Serialize)]
struct NearestRow {
    curve: usize,
    nearest: Option<usize>,
    distance: Option<f64>,
}

/// Per-curve nearest neighbor table (`curve,nearest,distance`).
pub fn write_nearest_csv(path: &Path, distances: &[Option<f64>], indices: &[Option<usize>]) -> Result<(), MeshError> {
    let mut w = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    for (curve, (&distance, &nearest)) in distances.iter().zip(indices).enumerate() {
        w.serialize(NearestRow {
            curve,
            nearest,
            distance,
        })
        .map_err(|e| csv_error(path, e))?;
    }
    w.flush().map_err(|e| MeshError::io(path, e))
}

#[derive(Serialize)]
struct HistogramRow {
    bin_center: f64,
    density: Option<f64>,
    count: u64,
}

/// Histogram table (`bin_center,density,count`); density is blank for raw counts.
pub fn write_histogram_csv(path: &Path, hist: &Histogram) -> Result<(), MeshError> {
    let mut w = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    for (k, (center, &count)) in hist.centers().into_iter().zip(&hist.counts).enumerate() {
        w.serialize(HistogramRow {
            bin_center: center,
            density: hist.density.get(k).copied(),
            count,
        })
        .map_err(|e| csv_error(path, e))?;
    }
    w.flush().map_err(|e| MeshError::io(path, e))
}

fn csv_error(path: &Path, err: csv::Error) -> MeshError {
    MeshError::io(path, std::io::Error::other(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scientific_format_matches_printf() {
        assert_eq!(format_sci(0.0), "+0.0000e+00");
        assert_eq!(format_sci(1.0), "+1.0000e+00");
        assert_eq!(format_sci(-12345.678), "-1.2346e+04");
        assert_eq!(format_sci(0.00012), "+1.2000e-04");
        assert_eq!(format_sci(2.5e-120), "+2.5000e-120");
        assert_eq!(format_sci(-1.0), "-1.0000e+00");
    }

    #[test]
    fn arma_text_layout() {
        let m = Matrix::new(2, 3, vec![1.0, -2.0, 0.5, 0.0, 10.0, -0.25]);
        let mut buf = Vec::new();
        write_arma_text_to(&mut buf, &m, "fiber diameter: 5, cnt diameter: 1.4").unwrap();
        let text = String::from_utf8(buf).unwrap();
        let expected = "\
ARMA_MAT_TXT_FN008
2 3
fiber diameter: 5, cnt diameter: 1.4
+1.0000e+00 -2.0000e+00 +5.0000e-01
+0.0000e+00 +1.0000e+01 -2.5000e-01
";
        assert_eq!(text, expected);
    }

    #[test]
    fn histogram_csv_columns() {
        let dir = std::env::temp_dir().join(format!("cnt-mesh-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("hist.csv");
        let hist = Histogram {
            lo: 0.0,
            hi: 2.0,
            counts: vec![1, 3],
            density: vec![0.25, 0.75],
        };
        write_histogram_csv(&path, &hist).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["bin_center,density,count", "0.5,0.25,1", "1.5,0.75,3"]);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
