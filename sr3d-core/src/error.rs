//! Errors raised while building or loading meshes.

use std::fmt::{self, Display, Formatter};
use std::io;

/// Error constructing, decoding, or loading a [`Mesh`][crate::Mesh].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// An I/O error occurred.
    Io(io::ErrorKind),
    /// The index buffer length is not a multiple of three.
    IndexCount(usize),
    /// A vertex index is past the end of the vertex buffer.
    IndexOutOfRange { index: usize, len: usize },
    /// A text format could not be parsed at the given 1-based line.
    Parse { line: usize, reason: String },
    /// Binary input ended before all declared data was read.
    Truncated,
    /// The file extension or content is not a supported mesh format.
    UnsupportedFormat(String),
}

impl std::error::Error for MeshError {}

impl Display for MeshError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::Io(kind) => write!(f, "i/o error reading mesh: {kind}"),
            MeshError::IndexCount(n) => {
                write!(f, "index count {n} is not a multiple of 3")
            }
            MeshError::IndexOutOfRange { index, len } => {
                write!(f, "vertex index {index} out of range for {len} vertices")
            }
            MeshError::Parse { line, reason } => {
                write!(f, "parse error on line {line}: {reason}")
            }
            MeshError::Truncated => write!(f, "unexpected end of mesh data"),
            MeshError::UnsupportedFormat(what) => {
                write!(f, "unsupported mesh format: {what}")
            }
        }
    }
}

impl From<io::Error> for MeshError {
    fn from(e: io::Error) -> Self {
        MeshError::Io(e.kind())
    }
}
