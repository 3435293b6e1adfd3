//! Renderer errors.

use inkpaint_core::{PayloadError, StorageError};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("Decoding failed: {0}")]
    Decode(String),
    #[error("Invalid payload: {0}")]
    Payload(#[from] PayloadError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<image::ImageError> for RendererError {
    fn from(err: image::ImageError) -> Self {
        RendererError::Decode(err.to_string())
    }
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;
