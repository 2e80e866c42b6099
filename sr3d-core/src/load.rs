//! Loading meshes from files.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::MeshError;
use crate::geometry::Mesh;
use crate::{obj, stl};

/// Mesh file formats, by extension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    Obj,
    Stl,
}

impl Format {
    /// Guesses the format from the extension of `path`, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self, MeshError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("obj") => Ok(Format::Obj),
            Some("stl") => Ok(Format::Stl),
            _ => Err(MeshError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Decodes file contents in this format.
    pub fn parse(self, data: &[u8]) -> Result<Mesh, MeshError> {
        match self {
            Format::Obj => {
                let text = std::str::from_utf8(data).map_err(|e| MeshError::Parse {
                    line: data[..e.valid_up_to()].iter().filter(|&&b| b == b'\n').count() + 1,
                    reason: "invalid UTF-8".into(),
                })?;
                obj::parse_obj(text)
            }
            Format::Stl => stl::parse_stl(data),
        }
    }
}

/// Loads an OBJ or STL file, choosing the parser by extension.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let data = fs::read(path)?;
    let mesh = format.parse(&data)?;
    info!(
        "Loaded {}: {} vertices, {} triangles.",
        path.display(),
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}
