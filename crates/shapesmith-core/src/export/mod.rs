//! Mesh export to interchange formats

mod obj;
mod stl;

use crate::error::ExportError;
use crate::mesh::Mesh;
use std::path::Path;

pub use obj::{export_obj, write_obj};
pub use stl::{export_stl, write_stl};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Obj,
    #[default]
    Stl,
}

impl ExportFormat {
    /// Detect format from file extension (case-insensitive)
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "obj" => Some(Self::Obj),
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }

    /// Like [`ExportFormat::from_extension`], but unknown extensions are an error
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        Self::from_extension(path)
            .ok_or_else(|| ExportError::UnknownFormat(path.display().to_string()))
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Obj => "obj",
            Self::Stl => "stl",
        }
    }

    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Obj => "OBJ",
            Self::Stl => "STL (Binary)",
        }
    }
}

/// Extension trait for exporting meshes
pub trait MeshExport {
    /// Export mesh to file, auto-detecting format from extension
    fn export<P: AsRef<Path>>(&self, path: P) -> Result<ExportFormat, ExportError>;
}

impl MeshExport for Mesh {
    fn export<P: AsRef<Path>>(&self, path: P) -> Result<ExportFormat, ExportError> {
        let path = path.as_ref();
        let format = ExportFormat::from_path(path)?;
        match format {
            ExportFormat::Obj => export_obj(self, path)?,
            ExportFormat::Stl => export_stl(self, path)?,
        }
        tracing::info!(path = %path.display(), format = format.name(), "Exported mesh");
        Ok(format)
    }
}
