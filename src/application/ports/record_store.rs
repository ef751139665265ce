//! Record store port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::note::{Note, NoteId};

/// Storage errors. Always recoverable: callers keep their in-memory state
/// as the source of truth and surface a warning instead of aborting, and a
/// failed operation never corrupts records that are already durable.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("failed to encode note record: {0}")]
    Encode(String),
}

/// Result of reading the whole store: every decodable record, plus a count
/// of records that had to be skipped because they were malformed. The count
/// lets the caller surface the loss instead of dropping records silently.
#[derive(Debug, Default)]
pub struct StoreSnapshot {
    pub notes: Vec<Note>,
    pub skipped: usize,
}

/// Port for durable per-note persistence.
///
/// All operations are asynchronous; the medium may involve I/O. Operations
/// on unrelated ids must not block one another.
#[async_trait]
pub trait NoteRecordStore: Send + Sync {
    /// Insert or fully overwrite the record at `note.id`.
    /// Must be atomic: a concurrent reader never observes a half-written
    /// record.
    async fn put(&self, note: &Note) -> Result<(), StorageError>;

    /// Read every stored record. Order is unspecified; the caller sorts.
    async fn get_all(&self) -> Result<StoreSnapshot, StorageError>;

    /// Remove the record at `id`. Deleting an absent id is a no-op.
    async fn delete(&self, id: &NoteId) -> Result<(), StorageError>;
}
