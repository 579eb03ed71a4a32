//! Error types for session operations.

use sense_capture::CaptureError;
use sense_data::MeshError;
use thiserror::Error;

/// Errors that can occur while driving a depth session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl SessionError {
    /// The source has no more frames.
    pub fn is_stream_end(&self) -> bool {
        matches!(self, SessionError::Capture(CaptureError::StreamEnded))
    }
}
