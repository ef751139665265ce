//! Note repository: the authoritative in-memory collection
//!
//! Owns the canonical set of notes and the "current note" pointer, and
//! mediates every read and write to the record store. Mutations go through
//! `update`/`save` only, which is what makes each change durable and keeps
//! the in-memory collection and the store in step. Storage failures degrade
//! to warnings: the in-memory state stays authoritative.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::application::ports::{
    NoteRecordStore, Renderer, StatusLevel, StorageError,
};
use crate::domain::language::Language;
use crate::domain::note::{Note, NoteId};

/// Repository-level errors: operating on an id that is not in the
/// collection. This indicates a coordination bug in the caller, not a
/// runtime condition, so it propagates instead of becoming a status message.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("no note with id {0}")]
    NotFound(NoteId),
}

/// Defaults applied when the repository has to create a note on its own
/// (startup bootstrap, deletion of the last note).
#[derive(Debug, Clone, Default)]
pub struct NoteDefaults {
    pub language: Language,
    pub custom_prompt: Option<String>,
}

/// What happened to the current pointer after a deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentAfterDelete {
    /// A non-current note was removed
    Unchanged,
    /// The current note was removed; the most recent survivor took over
    Switched(NoteId),
    /// The last note was removed; a fresh empty note was created
    Created(NoteId),
}

/// Result of populating the collection from the store
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOutcome {
    pub loaded: usize,
    pub skipped: usize,
}

struct Inner {
    notes: HashMap<NoteId, Note>,
    current: Option<NoteId>,
}

/// Cheap-clone handle over the canonical note collection.
///
/// The lock is only ever held across in-memory work, never across a store
/// or renderer await, so concurrent pipelines interleave at suspension
/// points without blocking each other on unrelated notes.
#[derive(Clone)]
pub struct NoteRepository {
    store: Arc<dyn NoteRecordStore>,
    renderer: Arc<dyn Renderer>,
    defaults: NoteDefaults,
    inner: Arc<Mutex<Inner>>,
}

/// Most-recent-first ordering: timestamp descending, id ascending on ties
/// so repeated queries are stable.
fn most_recent_first(a: &Note, b: &Note) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| a.id.cmp(&b.id))
}

impl NoteRepository {
    pub fn new(
        store: Arc<dyn NoteRecordStore>,
        renderer: Arc<dyn Renderer>,
        defaults: NoteDefaults,
    ) -> Self {
        Self {
            store,
            renderer,
            defaults,
            inner: Arc::new(Mutex::new(Inner {
                notes: HashMap::new(),
                current: None,
            })),
        }
    }

    /// Populate the collection from the record store.
    ///
    /// Fails closed: on a storage error the collection is left empty rather
    /// than partial, and the error is returned so the caller can warn and
    /// bootstrap a fresh note. Skipped (malformed) records are surfaced as
    /// a warning, never dropped silently.
    pub async fn load_all(&self) -> Result<LoadOutcome, StorageError> {
        let snapshot = match self.store.get_all().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let mut inner = self.inner.lock().await;
                inner.notes.clear();
                inner.current = None;
                return Err(e);
            }
        };

        let outcome = {
            let mut inner = self.inner.lock().await;
            inner.notes.clear();
            inner.current = None;
            for note in snapshot.notes {
                inner.notes.insert(note.id.clone(), note);
            }
            LoadOutcome {
                loaded: inner.notes.len(),
                skipped: snapshot.skipped,
            }
        };

        tracing::debug!(loaded = outcome.loaded, skipped = outcome.skipped, "notes loaded");
        if outcome.skipped > 0 {
            tracing::warn!(skipped = outcome.skipped, "malformed note records skipped");
            self.renderer
                .status(
                    StatusLevel::Warning,
                    &format!(
                        "{} stored note(s) could not be read and were skipped",
                        outcome.skipped
                    ),
                )
                .await;
        }
        Ok(outcome)
    }

    /// Startup bootstrap: make sure something is current. An empty
    /// collection gets a fresh note; otherwise the most recent note
    /// becomes current if nothing is.
    pub async fn ensure_current(&self) -> NoteId {
        {
            let mut inner = self.inner.lock().await;
            let valid = match inner.current.as_ref() {
                Some(id) => inner.notes.contains_key(id),
                None => false,
            };
            if !valid {
                let most_recent = inner
                    .notes
                    .values()
                    .min_by(|a, b| most_recent_first(a, b))
                    .map(|n| n.id.clone());
                inner.current = most_recent;
            }
            if let Some(id) = inner.current.clone() {
                return id;
            }
        }
        self.create_note(None, None).await
    }

    /// Create a new empty note, persist it, and make it current.
    /// Returns the new note's id.
    pub async fn create_note(
        &self,
        language: Option<Language>,
        custom_prompt: Option<String>,
    ) -> NoteId {
        let note = Note::new(
            language.unwrap_or_else(|| self.defaults.language.clone()),
            custom_prompt.or_else(|| self.defaults.custom_prompt.clone()),
        );
        let id = note.id.clone();

        let to_persist = {
            let mut inner = self.inner.lock().await;
            inner.notes.insert(id.clone(), note.clone());
            inner.current = Some(id.clone());
            note
        };

        tracing::debug!(id = %id, "note created");
        self.persist(&to_persist).await;
        id
    }

    /// Persist the current in-memory value of an existing note.
    /// This is the only path by which a mutation becomes durable.
    pub async fn save(&self, id: &NoteId) -> Result<(), RepositoryError> {
        let note = {
            let inner = self.inner.lock().await;
            inner
                .notes
                .get(id)
                .cloned()
                .ok_or_else(|| RepositoryError::NotFound(id.clone()))?
        };
        self.persist(&note).await;
        Ok(())
    }

    /// Mutate a note in memory and write the result through to the store.
    pub async fn update<F>(&self, id: &NoteId, mutate: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut Note),
    {
        let note = {
            let mut inner = self.inner.lock().await;
            let note = inner
                .notes
                .get_mut(id)
                .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
            mutate(note);
            note.clone()
        };
        self.persist(&note).await;
        Ok(())
    }

    /// Look up a note by id. Absent ids return None, never an error.
    pub async fn get(&self, id: &NoteId) -> Option<Note> {
        self.inner.lock().await.notes.get(id).cloned()
    }

    /// The id the editor is pointed at, if any
    pub async fn current_id(&self) -> Option<NoteId> {
        self.inner.lock().await.current.clone()
    }

    /// The note the editor is pointed at, if any
    pub async fn current(&self) -> Option<Note> {
        let inner = self.inner.lock().await;
        inner
            .current
            .as_ref()
            .and_then(|id| inner.notes.get(id))
            .cloned()
    }

    /// Point the editor at another note
    pub async fn set_current(&self, id: &NoteId) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().await;
        if !inner.notes.contains_key(id) {
            return Err(RepositoryError::NotFound(id.clone()));
        }
        inner.current = Some(id.clone());
        Ok(())
    }

    /// Remove a note from the collection and the store.
    ///
    /// When the current note dies the repository itself picks the
    /// replacement, most recent survivor or a fresh note when the
    /// collection became empty, so every deletion path behaves the same.
    pub async fn delete(&self, id: &NoteId) -> Result<CurrentAfterDelete, RepositoryError> {
        enum NextCurrent {
            Unchanged,
            Switched(NoteId),
            NeedFresh,
        }

        let next = {
            let mut inner = self.inner.lock().await;
            if inner.notes.remove(id).is_none() {
                return Err(RepositoryError::NotFound(id.clone()));
            }
            if inner.current.as_ref() == Some(id) {
                match inner
                    .notes
                    .values()
                    .min_by(|a, b| most_recent_first(a, b))
                    .map(|n| n.id.clone())
                {
                    Some(next_id) => {
                        inner.current = Some(next_id.clone());
                        NextCurrent::Switched(next_id)
                    }
                    None => {
                        inner.current = None;
                        NextCurrent::NeedFresh
                    }
                }
            } else {
                NextCurrent::Unchanged
            }
        };

        if let Err(e) = self.store.delete(id).await {
            tracing::warn!(id = %id, error = %e, "failed to delete note record");
            self.renderer
                .status(
                    StatusLevel::Warning,
                    &format!("Could not remove stored note: {}", e),
                )
                .await;
        }
        tracing::debug!(id = %id, "note deleted");

        match next {
            NextCurrent::Unchanged => Ok(CurrentAfterDelete::Unchanged),
            NextCurrent::Switched(next_id) => Ok(CurrentAfterDelete::Switched(next_id)),
            NextCurrent::NeedFresh => {
                let fresh = self.create_note(None, None).await;
                Ok(CurrentAfterDelete::Created(fresh))
            }
        }
    }

    /// All notes, most recent first
    pub async fn list(&self) -> Vec<Note> {
        let mut notes: Vec<Note> = self.inner.lock().await.notes.values().cloned().collect();
        notes.sort_by(most_recent_first);
        notes
    }

    /// Number of notes in the collection
    pub async fn len(&self) -> usize {
        self.inner.lock().await.notes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.notes.is_empty()
    }

    /// Write a note to the store and notify the renderer. A failed put is
    /// a warning, not an abort: the in-memory copy remains authoritative
    /// and repeated failures never corrupt already-durable records.
    async fn persist(&self, note: &Note) {
        match self.store.put(note).await {
            Ok(()) => tracing::debug!(id = %note.id, "note persisted"),
            Err(e) => {
                tracing::warn!(id = %note.id, error = %e, "failed to persist note");
                self.renderer
                    .status(StatusLevel::Warning, &format!("Could not save note: {}", e))
                    .await;
            }
        }
        self.renderer.note_updated(note).await;
    }
}
