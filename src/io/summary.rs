//! Write the JSON run summary.
//!
//! The summary sits next to the numeric outputs and records what produced
//! them: operation, mesh directory, parameters and headline statistics.

use std::fs::File;
use std::path::Path;

use crate::domain::RunSummary;
use crate::error::MeshError;

pub const TOOL_NAME: &str = "cntmesh";

impl RunSummary {
    pub fn new(
        operation: &str,
        mesh_dir: &Path,
        curves: usize,
        parameters: serde_json::Value,
        statistics: serde_json::Value,
    ) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            generated: chrono::Local::now().to_rfc3339(),
            operation: operation.to_string(),
            mesh_dir: mesh_dir.to_path_buf(),
            curves,
            parameters,
            statistics,
        }
    }
}

pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<(), MeshError> {
    let file = File::create(path).map_err(|e| MeshError::io(path, e))?;
    serde_json::to_writer_pretty(file, summary).map_err(|e| MeshError::io(path, std::io::Error::other(e)))
}
