//! Error types for grid and mesh operations.

use thiserror::Error;

/// Errors that can occur while building or exporting a depth mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON export error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MeshError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MeshError::InvalidArgument(msg.into())
    }

    /// Whether this error was raised for malformed input rather than I/O.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, MeshError::InvalidArgument(_))
    }
}
