//! In-memory storage implementation.

use super::{BoxFuture, DrawingStore, StorageError, StorageResult};
use crate::api::{Drawing, DrawingId, DrawingSummary, UserId};
use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Default)]
struct Inner {
    next_id: DrawingId,
    drawings: BTreeMap<DrawingId, Drawing>,
}

/// In-memory store for offline use and tests.
///
/// Ids are assigned in increasing order, so listing by descending id is
/// listing newest first.
pub struct MemoryStore {
    owner: UserId,
    inner: RwLock<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty store owned by user 0.
    pub fn new() -> Self {
        Self::for_user(0)
    }

    /// Create a new empty store owned by `owner`.
    pub fn for_user(owner: UserId) -> Self {
        Self {
            owner,
            inner: RwLock::new(Inner {
                next_id: 1,
                drawings: BTreeMap::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.drawings.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

fn timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    secs.to_string()
}

impl DrawingStore for MemoryStore {
    fn save(&self, name: &str, data: &str) -> BoxFuture<'_, StorageResult<DrawingId>> {
        let name = name.to_string();
        let data = data.to_string();
        Box::pin(async move {
            if name.is_empty() || data.is_empty() {
                return Err(StorageError::Invalid("Name and data are required".to_string()));
            }
            let mut inner = self.inner.write().map_err(lock_error)?;
            let id = inner.next_id;
            inner.next_id += 1;
            inner.drawings.insert(
                id,
                Drawing {
                    id,
                    user_id: self.owner,
                    name,
                    data,
                    created_at: timestamp(),
                },
            );
            log::debug!("Stored drawing {} in memory", id);
            Ok(id)
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<DrawingSummary>>> {
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            Ok(inner.drawings.values().rev().map(Drawing::summary).collect())
        })
    }

    fn load(&self, id: DrawingId) -> BoxFuture<'_, StorageResult<Drawing>> {
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            inner
                .drawings
                .get(&id)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(format!("Drawing {}", id)))
        })
    }

    fn delete(&self, id: DrawingId) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.write().map_err(lock_error)?;
            inner
                .drawings
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| StorageError::NotFound(format!("Drawing {}", id)))
        })
    }
}
