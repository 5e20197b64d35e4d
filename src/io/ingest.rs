//! Curve loader.
//!
//! A mesh directory holds `tube{i}.pos.dat` files for `i` in `1..100`; missing
//! files are skipped. Every non-empty line is one fiber:
//!
//! ```text
//! index; x1,y1,z1; x2,y2,z2; ...;
//! ```
//!
//! Records are read with `csv` using `;` as the delimiter. The leading index is
//! discarded and trailing `;`/spaces are ignored.
//! Any malformed point aborts the load with the file and 1-based line number.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use nalgebra::Point3;

use crate::curve::Curve;
use crate::domain::MeshConfig;
use crate::error::MeshError;

/// File indices probed in a mesh directory.
pub const FILE_INDICES: std::ops::Range<usize> = 1..100;

pub fn tube_file_name(index: usize) -> String {
    format!("tube{index}.pos.dat")
}

/// Loaded mesh plus per-file bookkeeping for reports.
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    pub curves: Vec<Curve>,
    /// `(file, curves read)` in load order.
    pub files: Vec<(PathBuf, usize)>,
}

/// Load every curve in `config.dir`, deriving the fine resolution.
pub fn load_mesh(config: &MeshConfig) -> Result<LoadedMesh, MeshError> {
    if config.fine_points < 2 {
        return Err(MeshError::InvalidConfig(format!(
            "fine resolution needs at least 2 points (got {})",
            config.fine_points
        )));
    }
    if !config.dir.is_dir() {
        return Err(MeshError::io(
            &config.dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "mesh directory not found"),
        ));
    }

    let mut curves = Vec::new();
    let mut files = Vec::new();

    for i in FILE_INDICES {
        let path = config.dir.join(tube_file_name(i));
        if !path.is_file() {
            continue;
        }
        log::info!("reading file: {}", path.display());
        let rough = read_curve_file(&path)?;
        files.push((path, rough.len()));
        curves.extend(rough.into_iter().map(|r| Curve::from_rough(r, config.fine_points)));
    }

    if curves.is_empty() {
        return Err(MeshError::NoCurves {
            dir: config.dir.clone(),
        });
    }

    log::info!("loaded {} curves from {} files", curves.len(), files.len());
    Ok(LoadedMesh { curves, files })
}

/// Rough point sequences of every fiber in one file.
pub fn read_curve_file(path: &Path) -> Result<Vec<Vec<Point3<f64>>>, MeshError> {
    let file = File::open(path).map_err(|e| MeshError::io(path, e))?;
    read_curve_records(file, path)
}

/// Parse `;`-delimited curve records from `reader`; `path` only labels errors.
pub fn read_curve_records<R: Read>(reader: R, path: &Path) -> Result<Vec<Vec<Point3<f64>>>, MeshError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    let mut record = StringRecord::new();
    loop {
        match rdr.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => return Err(MeshError::io(path, std::io::Error::other(e))),
        }
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line() as usize);
        out.push(parse_curve_record(&record).map_err(|err| err.at(path, line))?);
    }
    Ok(out)
}

/// Line-level failure, located later by [`read_curve_records`].
#[derive(Debug, Clone, PartialEq)]
pub enum LineError {
    Empty,
    Malformed(String),
}

impl LineError {
    fn at(self, file: &Path, line: usize) -> MeshError {
        let file = file.to_path_buf();
        match self {
            LineError::Empty => MeshError::EmptyCurve { file, line },
            LineError::Malformed(message) => MeshError::MalformedInput {
                file,
                line,
                message,
            },
        }
    }
}

/// Parse one `index; x,y,z; ...` record (fields already trimmed).
pub fn parse_curve_record(record: &StringRecord) -> Result<Vec<Point3<f64>>, LineError> {
    let mut fields: Vec<&str> = record.iter().collect();
    // Trailing separators leave empty fields.
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }

    // Leading fiber index.
    fields
        .iter()
        .skip(1)
        .enumerate()
        .map(|(k, field)| parse_point(k, field))
        .collect::<Result<Vec<_>, _>>()
        .and_then(|points| if points.is_empty() { Err(LineError::Empty) } else { Ok(points) })
}

fn parse_point(k: usize, field: &str) -> Result<Point3<f64>, LineError> {
    let coords: Vec<&str> = field.split(',').map(str::trim).collect();
    if coords.len() != 3 {
        return Err(LineError::Malformed(format!(
            "point {k}: expected 3 coordinates, got {}",
            coords.len()
        )));
    }
    let mut xyz = [0.0f64; 3];
    for (slot, raw) in xyz.iter_mut().zip(&coords) {
        let value = raw
            .parse::<f64>()
            .map_err(|_| LineError::Malformed(format!("point {k}: invalid number '{raw}'")))?;
        if !value.is_finite() {
            return Err(LineError::Malformed(format!("point {k}: non-finite coordinate '{raw}'")));
        }
        *slot = value;
    }
    Ok(Point3::new(xyz[0], xyz[1], xyz[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cnt-mesh-ingest-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn parse(text: &str) -> Result<Vec<Vec<Point3<f64>>>, MeshError> {
        read_curve_records(text.as_bytes(), Path::new("tube1.pos.dat"))
    }

    fn malformed_line(err: MeshError) -> usize {
        match err {
            MeshError::MalformedInput { line, .. } => line,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parses_record_with_trailing_separator() {
        let curves = parse("7; 0,1,2; 3.5,-4,5e-1; \r\n").unwrap();
        assert_eq!(curves, vec![vec![Point3::new(0.0, 1.0, 2.0), Point3::new(3.5, -4.0, 0.5)]]);
    }

    #[test]
    fn rejects_bad_points() {
        assert_eq!(malformed_line(parse("1; 0,1; 2,3,4;").unwrap_err()), 1);
        assert_eq!(malformed_line(parse("0; 1,1,1;\n1; 0,a,1;").unwrap_err()), 2);
        assert!(matches!(parse("1;"), Err(MeshError::EmptyCurve { line: 1, .. })));
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        assert_eq!(malformed_line(parse("0; 0,0,0; nan,1,2;").unwrap_err()), 1);
        assert_eq!(malformed_line(parse("0; 0,0,0;\n1; 1,inf,2;").unwrap_err()), 2);
        assert_eq!(malformed_line(parse("0; -infinity,0,0;").unwrap_err()), 1);
    }

    #[test]
    fn loads_present_files_and_skips_missing() {
        let dir = temp_dir("skip");
        fs::write(dir.join("tube1.pos.dat"), "0; 0,0,0; 1,0,0; 2,0,0;\n1; 0,1,0; 1,1,0;\n").unwrap();
        fs::write(dir.join("tube3.pos.dat"), "\n0; 0,2,0; 0,2,1; 0,2,2;\n").unwrap();

        let mesh = load_mesh(&MeshConfig {
            dir: dir.clone(),
            fine_points: 10,
        })
        .unwrap();
        assert_eq!(mesh.curves.len(), 3);
        assert_eq!(mesh.files.len(), 2);
        assert_eq!(mesh.files[1].1, 1);
        assert!(mesh.curves.iter().all(|c| c.num_nodes(crate::domain::Resolution::Fine) == 10));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn reports_file_and_line() {
        let dir = temp_dir("line");
        fs::write(dir.join("tube2.pos.dat"), "0; 0,0,0;\n\n1; 0,0;\n").unwrap();
        let err = load_mesh(&MeshConfig {
            dir: dir.clone(),
            fine_points: 10,
        })
        .unwrap_err();
        match err {
            MeshError::MalformedInput { file, line, .. } => {
                assert!(file.ends_with("tube2.pos.dat"));
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_directory_has_no_curves() {
        let dir = temp_dir("empty");
        let err = load_mesh(&MeshConfig {
            dir: dir.clone(),
            fine_points: 10,
        })
        .unwrap_err();
        assert!(matches!(err, MeshError::NoCurves { .. }));
        assert_eq!(err.exit_code(), 3);
        let _ = fs::remove_dir_all(&dir);
    }
}
