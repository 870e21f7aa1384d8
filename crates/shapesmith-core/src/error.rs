//! Error types for Shapesmith

use crate::kernel::KernelError;
use thiserror::Error;

/// Result type alias using Shapesmith's build error
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors that abort a single build request
///
/// Every variant is terminal: no partial shape is returned and nothing is
/// retried, since construction is deterministic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// The type tag does not name a supported shape kind
    #[error("Unknown shape kind: '{0}'")]
    UnknownShapeKind(String),

    /// A required parameter is absent from the descriptor
    #[error("Missing parameter: '{0}'")]
    MissingParameter(String),

    /// A parameter is present but has the wrong type or violates a domain constraint
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A transform record is malformed
    #[error("Invalid transform '{field}': {reason}")]
    InvalidTransformSpec { field: String, reason: String },

    /// A boolean fold was requested over zero operands
    #[error("Boolean operation needs at least one operand")]
    EmptyOperandList,

    /// The geometry kernel rejected an operation
    #[error("Kernel failure: {0}")]
    Kernel(#[from] KernelError),
}

impl BuildError {
    pub(crate) fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }

    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn transform(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTransformSpec {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending descriptor field, where the error carries one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingParameter(name) | Self::InvalidParameter { name, .. } => Some(name),
            Self::InvalidTransformSpec { field, .. } => Some(field),
            Self::UnknownShapeKind(_) | Self::EmptyOperandList | Self::Kernel(_) => None,
        }
    }
}

/// Errors raised while writing a mesh to disk
#[derive(Error, Debug)]
pub enum ExportError {
    /// The path's extension does not map to a known format
    #[error("Unknown file extension: {0}")]
    UnknownFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
