//! Drawing persistence, client side.

mod http;
mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use crate::api::{Drawing, DrawingId, DrawingSummary};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    Invalid(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl StorageError {
    /// Map an HTTP error status and the server's message onto an error.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 => StorageError::Invalid(message),
            401 => StorageError::Unauthorized(message),
            403 => StorageError::Forbidden(message),
            404 => StorageError::NotFound(message),
            409 => StorageError::Conflict(message),
            _ => StorageError::Server { status, message },
        }
    }

    /// Whether signing in again could fix this error.
    pub fn needs_login(&self) -> bool {
        matches!(self, StorageError::Unauthorized(_) | StorageError::Forbidden(_))
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for store operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for drawing storage backends.
///
/// Backends are scoped to one user: whatever identity the backend carries
/// decides which drawings are visible.
pub trait DrawingStore: Send + Sync {
    /// Store a drawing and return its id.
    fn save(&self, name: &str, data: &str) -> BoxFuture<'_, StorageResult<DrawingId>>;

    /// List drawings, newest first, without payloads.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<DrawingSummary>>>;

    /// Load one drawing with its payload.
    fn load(&self, id: DrawingId) -> BoxFuture<'_, StorageResult<Drawing>>;

    /// Delete one drawing.
    fn delete(&self, id: DrawingId) -> BoxFuture<'_, StorageResult<()>>;
}
