//! Error types.
//!
//! Two layers:
//!
//! - [`MeshError`]: typed domain failures raised by the loader, the expansion
//!   driver and the output layer. They carry the file/line or curve/sample
//!   context needed to find the offending record.
//! - [`AppError`]: what the binary reports. Every domain error maps to an exit
//!   code (2 = input/config/I-O, 3 = no usable data, 4 = computation).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Malformed curve record in '{}' line {line}: {message}", file.display())]
    MalformedInput {
        file: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Empty point sequence in '{}' line {line}.", file.display())]
    EmptyCurve { file: PathBuf, line: usize },

    #[error("Shape mismatch for curve {curve}: {centerline} centerline samples vs {frames} frames.")]
    ShapeMismatch {
        curve: usize,
        centerline: usize,
        frames: usize,
    },

    #[error("Curve {curve} has {samples} samples but earlier curves have {expected}; matrix outputs need a common count.")]
    RaggedSamples {
        curve: usize,
        samples: usize,
        expected: usize,
    },

    #[error("No curve files (tube*.pos.dat) found in '{}'.", dir.display())]
    NoCurves { dir: PathBuf },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MeshError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshError::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code used when this error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            MeshError::MalformedInput { .. }
            | MeshError::EmptyCurve { .. }
            | MeshError::Io { .. }
            | MeshError::InvalidConfig(_) => 2,
            MeshError::NoCurves { .. } => 3,
            MeshError::ShapeMismatch { .. } | MeshError::RaggedSamples { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<MeshError> for AppError {
    fn from(err: MeshError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_errors_map_to_exit_codes() {
        let err = MeshError::ShapeMismatch {
            curve: 3,
            centerline: 10,
            frames: 9,
        };
        let app: AppError = err.into();
        assert_eq!(app.exit_code(), 4);
        assert!(app.to_string().contains("curve 3"));

        let err = MeshError::RaggedSamples {
            curve: 2,
            samples: 40,
            expected: 100,
        };
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().starts_with("Curve 2 has 40 samples but earlier curves have 100"));

        let err = MeshError::MalformedInput {
            file: PathBuf::from("tube1.pos.dat"),
            line: 7,
            message: "expected 3 coordinates, got 2".to_string(),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("line 7"));
    }
}
