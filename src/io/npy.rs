//! NumPy `.npy` writer (format version 1.0, `<f8`, C order, 2-D).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::MeshError;
use crate::io::array::Matrix;

const MAGIC: &[u8] = b"\x93NUMPY";
/// Magic (6) + version (2) + header length (2).
const PREAMBLE_LEN: usize = 10;
const ALIGN: usize = 64;

/// Header bytes: preamble plus the space-padded dict, newline-terminated.
pub fn npy_header(rows: usize, cols: usize) -> Vec<u8> {
    let dict = format!("{{'descr': '<f8', 'fortran_order': False, 'shape': ({rows}, {cols}), }}");
    let unpadded = PREAMBLE_LEN + dict.len() + 1;
    let pad = (ALIGN - unpadded % ALIGN) % ALIGN;
    let header_len = dict.len() + pad + 1;

    let mut out = Vec::with_capacity(PREAMBLE_LEN + header_len);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header_len as u16).to_le_bytes());
    out.extend_from_slice(dict.as_bytes());
    out.extend(std::iter::repeat_n(b' ', pad));
    out.push(b'\n');
    out
}

pub fn write_npy_to(mut w: impl Write, matrix: &Matrix) -> std::io::Result<()> {
    w.write_all(&npy_header(matrix.rows(), matrix.cols()))?;
    for v in matrix.data() {
        w.write_all(&v.to_le_bytes())?;
    }
    w.flush()
}

pub fn write_npy(path: &Path, matrix: &Matrix) -> Result<(), MeshError> {
    let file = File::create(path).map_err(|e| MeshError::io(path, e))?;
    write_npy_to(BufWriter::new(file), matrix).map_err(|e| MeshError::io(path, e))
}
