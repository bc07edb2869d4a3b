//! # NumPy Feature Matrix Artifact
//!
//! Feature matrices are stored as `.npy` files so they can be inspected with
//! standard numeric tooling.
//!
//! Written: format v1.0, dtype `|i1`, C order, shape `(rows, cols)`.
//!
//! Read:
//! - format v1.x (u16 header length) and v2.x/v3.x (u32 header length)
//! - dtypes `|i1`, `|u1`, `|b1`, `<i2`, `<i4`, `<i8`, `<u2`, `<u4`, `<u8`
//! - C or Fortran order, 2-D shapes only
//! - every value must be 0 or 1

use crate::MotifdexError;
use crate::features::FeatureMatrix;
use crate::primitives::MAX_ARTIFACT_SIZE;
use std::path::{Path, PathBuf};

const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Preamble (magic + version + u16 length) plus header are padded to this.
const HEADER_ALIGNMENT: usize = 64;

fn invalid(reason: impl Into<String>) -> MotifdexError {
    MotifdexError::SerializationError(format!("Invalid .npy data: {}", reason.into()))
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encode a matrix as a v1.0 `.npy` byte stream.
#[must_use]
pub fn matrix_to_npy(matrix: &FeatureMatrix) -> Vec<u8> {
    let mut header = format!(
        "{{'descr': '|i1', 'fortran_order': False, 'shape': ({}, {}), }}",
        matrix.rows(),
        matrix.cols()
    );
    // magic(6) + version(2) + length(2) + header + '\n'
    let unpadded = NPY_MAGIC.len() + 4 + header.len() + 1;
    let padding = (HEADER_ALIGNMENT - unpadded % HEADER_ALIGNMENT) % HEADER_ALIGNMENT;
    header.push_str(&" ".repeat(padding));
    header.push('\n');

    let mut out = Vec::with_capacity(NPY_MAGIC.len() + 4 + header.len() + matrix.cells().len());
    out.extend_from_slice(NPY_MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(matrix.cells());
    out
}

// =============================================================================
// DECODING
// =============================================================================

/// Element types accepted on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dtype {
    Signed(usize),
    Unsigned(usize),
}

impl Dtype {
    fn parse(descr: &str) -> Result<Self, MotifdexError> {
        match descr {
            "|i1" => Ok(Dtype::Signed(1)),
            "|u1" | "|b1" => Ok(Dtype::Unsigned(1)),
            "<i2" => Ok(Dtype::Signed(2)),
            "<i4" => Ok(Dtype::Signed(4)),
            "<i8" => Ok(Dtype::Signed(8)),
            "<u2" => Ok(Dtype::Unsigned(2)),
            "<u4" => Ok(Dtype::Unsigned(4)),
            "<u8" => Ok(Dtype::Unsigned(8)),
            other => Err(invalid(format!("unsupported dtype '{}'", other))),
        }
    }

    fn width(self) -> usize {
        match self {
            Dtype::Signed(w) | Dtype::Unsigned(w) => w,
        }
    }

    /// Decode one little-endian element as a 0/1 cell.
    fn cell(self, bytes: &[u8], index: usize) -> Result<u8, MotifdexError> {
        let mut buf = [0u8; 8];
        buf[..bytes.len()].copy_from_slice(bytes);
        let negative = matches!(self, Dtype::Signed(w) if bytes[w - 1] & 0x80 != 0);
        let value = u64::from_le_bytes(buf);
        match (negative, value) {
            (false, 0) => Ok(0),
            (false, 1) => Ok(1),
            _ => Err(invalid(format!("non-binary value at element {}", index))),
        }
    }
}

struct NpyHeader {
    dtype: Dtype,
    fortran_order: bool,
    rows: usize,
    cols: usize,
}

/// Text following `'key':` in a header dictionary.
fn dict_value<'a>(header: &'a str, key: &str) -> Result<&'a str, MotifdexError> {
    let pattern = format!("'{}':", key);
    let start = header
        .find(&pattern)
        .ok_or_else(|| invalid(format!("header lacks '{}'", key)))?;
    Ok(header[start + pattern.len()..].trim_start())
}

fn parse_header(header: &str) -> Result<NpyHeader, MotifdexError> {
    let descr = dict_value(header, "descr")?;
    let descr = descr
        .strip_prefix('\'')
        .and_then(|rest| rest.split('\'').next())
        .ok_or_else(|| invalid("malformed descr"))?;
    let dtype = Dtype::parse(descr)?;

    let fortran = dict_value(header, "fortran_order")?;
    let fortran_order = if fortran.starts_with("True") {
        true
    } else if fortran.starts_with("False") {
        false
    } else {
        return Err(invalid("malformed fortran_order"));
    };

    let shape = dict_value(header, "shape")?;
    let shape = shape
        .strip_prefix('(')
        .and_then(|rest| rest.split(')').next())
        .ok_or_else(|| invalid("malformed shape"))?;
    let dims: Vec<usize> = shape
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| d.parse::<usize>().map_err(|_| invalid(format!("bad dimension '{}'", d))))
        .collect::<Result<_, _>>()?;
    let &[rows, cols] = dims.as_slice() else {
        return Err(invalid(format!("expected a 2-D shape, found {} dimensions", dims.len())));
    };

    Ok(NpyHeader {
        dtype,
        fortran_order,
        rows,
        cols,
    })
}

/// Decode a `.npy` byte stream into a binary matrix.
pub fn matrix_from_npy(bytes: &[u8]) -> Result<FeatureMatrix, MotifdexError> {
    if bytes.len() < NPY_MAGIC.len() + 4 || &bytes[..NPY_MAGIC.len()] != NPY_MAGIC {
        return Err(invalid("missing magic string"));
    }
    let major = bytes[6];
    let (header_len, preamble) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => {
            if bytes.len() < 12 {
                return Err(invalid("truncated preamble"));
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
            (len as usize, 12)
        }
        other => return Err(invalid(format!("unsupported format version {}", other))),
    };

    let data_start = preamble + header_len;
    if bytes.len() < data_start {
        return Err(invalid("truncated header"));
    }
    let header = std::str::from_utf8(&bytes[preamble..data_start])
        .map_err(|_| invalid("header is not text"))?;
    let header = parse_header(header)?;

    let width = header.dtype.width();
    let count = header
        .rows
        .checked_mul(header.cols)
        .ok_or_else(|| invalid("shape overflows"))?;
    let expected = count
        .checked_mul(width)
        .ok_or_else(|| invalid("shape overflows"))?;
    let data = &bytes[data_start..];
    if data.len() != expected {
        return Err(invalid(format!(
            "expected {} data bytes, found {}",
            expected,
            data.len()
        )));
    }

    let mut cells = vec![0u8; count];
    for (index, chunk) in data.chunks_exact(width).enumerate() {
        let value = header.dtype.cell(chunk, index)?;
        let slot = if header.fortran_order {
            // column-major: index = col * rows + row
            let (col, row) = (index / header.rows, index % header.rows);
            row * header.cols + col
        } else {
            index
        };
        cells[slot] = value;
    }

    FeatureMatrix::from_cells(header.rows, header.cols, cells)
}

// =============================================================================
// FILE HELPERS
// =============================================================================

/// Write a matrix to exactly `path`.
pub fn save_matrix(path: &Path, matrix: &FeatureMatrix) -> Result<(), MotifdexError> {
    std::fs::write(path, matrix_to_npy(matrix)).map_err(|e| {
        MotifdexError::IoError(format!("Cannot write '{}': {}", path.display(), e))
    })
}

/// `path` if it exists, else `path` with `.npy` appended.
#[must_use]
pub fn resolve_matrix_path(path: &Path) -> PathBuf {
    if path.exists() {
        return path.to_path_buf();
    }
    let mut with_ext = path.as_os_str().to_owned();
    with_ext.push(".npy");
    PathBuf::from(with_ext)
}

/// Load a matrix, falling back to `<path>.npy` when `path` is missing.
pub fn load_matrix(path: &Path) -> Result<FeatureMatrix, MotifdexError> {
    let resolved = resolve_matrix_path(path);
    let size = std::fs::metadata(&resolved)
        .map_err(|e| {
            MotifdexError::IoError(format!("Cannot read '{}': {}", resolved.display(), e))
        })?
        .len();
    if size > MAX_ARTIFACT_SIZE {
        return Err(MotifdexError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            size, MAX_ARTIFACT_SIZE
        )));
    }
    let bytes = std::fs::read(&resolved).map_err(|e| {
        MotifdexError::IoError(format!("Cannot read '{}': {}", resolved.display(), e))
    })?;
    matrix_from_npy(&bytes)
}

// =============================================================================
// TESTS
// =============================================================================
