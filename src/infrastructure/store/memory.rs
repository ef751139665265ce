//! In-memory record store adapter
//!
//! Backs tests and doubles as proof that the repository is indifferent to
//! the storage medium behind the port.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::ports::{NoteRecordStore, StorageError, StoreSnapshot};
use crate::domain::note::{Note, NoteId};

/// Record store held entirely in memory
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<NoteId, Note>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRecordStore for MemoryRecordStore {
    async fn put(&self, note: &Note) -> Result<(), StorageError> {
        self.records
            .lock()
            .await
            .insert(note.id.clone(), note.clone());
        Ok(())
    }

    async fn get_all(&self) -> Result<StoreSnapshot, StorageError> {
        Ok(StoreSnapshot {
            notes: self.records.lock().await.values().cloned().collect(),
            skipped: 0,
        })
    }

    async fn delete(&self, id: &NoteId) -> Result<(), StorageError> {
        self.records.lock().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::language::Language;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryRecordStore::new();
        let note = Note::new(Language::default(), None);

        store.put(&note).await.unwrap();
        assert_eq!(store.get_all().await.unwrap().notes.len(), 1);

        store.delete(&note.id).await.unwrap();
        assert!(store.get_all().await.unwrap().notes.is_empty());
    }

    #[tokio::test]
    async fn put_replaces_existing_record() {
        let store = MemoryRecordStore::new();
        let mut note = Note::new(Language::default(), None);

        store.put(&note).await.unwrap();
        note.title = "Second".to_string();
        store.put(&note).await.unwrap();

        let snapshot = store.get_all().await.unwrap();
        assert_eq!(snapshot.notes.len(), 1);
        assert_eq!(snapshot.notes[0].title, "Second");
    }

    #[tokio::test]
    async fn delete_absent_is_no_op() {
        let store = MemoryRecordStore::new();
        store.delete(&NoteId::from("missing")).await.unwrap();
    }
}
