//! SQLite record store adapter
//!
//! One row per note, audio blob inline. Uses WAL mode for crash safety;
//! every `put` is a single upsert statement, so readers never observe a
//! half-written record. Rows that fail to decode (a blob without a MIME
//! type, an unreadable timestamp) are counted and skipped rather than
//! silently dropped or allowed to poison the whole load.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::application::ports::{NoteRecordStore, StorageError, StoreSnapshot};
use crate::domain::audio::{AudioMimeType, AudioPayload};
use crate::domain::note::{Note, NoteId};

fn backend(e: sqlx::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

/// SQLite-backed note store
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Open (creating if missing) the database at the given path
    pub async fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Backend(e.to_string()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(backend)?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Open an in-memory database, for tests
    pub async fn in_memory() -> Result<Self, StorageError> {
        // A single connection: each sqlite::memory: connection is its own db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(backend)?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StorageError> {
        tracing::debug!("initializing note store schema");

        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notes (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                raw_transcription TEXT NOT NULL,
                polished_note TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                audio BLOB,
                audio_mime TEXT,
                target_language TEXT NOT NULL,
                custom_prompt TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }

    fn decode_row(row: &SqliteRow) -> Result<Note, String> {
        let id: String = row.try_get("id").map_err(|e| e.to_string())?;
        let title: String = row.try_get("title").map_err(|e| e.to_string())?;
        let raw_transcription: String = row
            .try_get("raw_transcription")
            .map_err(|e| e.to_string())?;
        let polished_note: String = row.try_get("polished_note").map_err(|e| e.to_string())?;
        let timestamp: DateTime<Utc> = row.try_get("timestamp").map_err(|e| e.to_string())?;

        let audio_bytes: Option<Vec<u8>> = row.try_get("audio").map_err(|e| e.to_string())?;
        let audio_mime: Option<String> = row.try_get("audio_mime").map_err(|e| e.to_string())?;
        let audio = match (audio_bytes, audio_mime) {
            (None, None) => None,
            (Some(bytes), Some(mime)) => {
                let mime = AudioMimeType::from_mime(&mime)
                    .ok_or_else(|| format!("unknown audio MIME type: {}", mime))?;
                Some(AudioPayload::new(bytes, mime))
            }
            // A payload without a MIME type (or vice versa) is unusable.
            _ => return Err("audio payload and MIME type out of step".to_string()),
        };

        let language: String = row.try_get("target_language").map_err(|e| e.to_string())?;
        let target_language = language
            .parse()
            .map_err(|e| format!("bad language tag: {}", e))?;

        let custom_prompt: Option<String> =
            row.try_get("custom_prompt").map_err(|e| e.to_string())?;

        Ok(Note {
            id: NoteId::from(id),
            title,
            raw_transcription,
            polished_note,
            timestamp,
            audio,
            target_language,
            custom_prompt,
        })
    }
}

#[async_trait]
impl NoteRecordStore for SqliteRecordStore {
    async fn put(&self, note: &Note) -> Result<(), StorageError> {
        let audio_bytes = note.audio.as_ref().map(|a| a.data().to_vec());
        let audio_mime = note.audio.as_ref().map(|a| a.mime_type().as_str());

        sqlx::query(
            r#"
            INSERT INTO notes (id, title, raw_transcription, polished_note,
                               timestamp, audio, audio_mime, target_language, custom_prompt)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                raw_transcription = excluded.raw_transcription,
                polished_note = excluded.polished_note,
                timestamp = excluded.timestamp,
                audio = excluded.audio,
                audio_mime = excluded.audio_mime,
                target_language = excluded.target_language,
                custom_prompt = excluded.custom_prompt
            "#,
        )
        .bind(note.id.as_str())
        .bind(&note.title)
        .bind(&note.raw_transcription)
        .bind(&note.polished_note)
        .bind(note.timestamp)
        .bind(audio_bytes)
        .bind(audio_mime)
        .bind(note.target_language.code())
        .bind(&note.custom_prompt)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }

    async fn get_all(&self) -> Result<StoreSnapshot, StorageError> {
        let rows = sqlx::query("SELECT * FROM notes")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        let mut snapshot = StoreSnapshot::default();
        for row in &rows {
            match Self::decode_row(row) {
                Ok(note) => snapshot.notes.push(note),
                Err(reason) => {
                    let id: String = row.try_get("id").unwrap_or_default();
                    tracing::warn!(id = %id, reason = %reason, "skipping malformed note record");
                    snapshot.skipped += 1;
                }
            }
        }
        Ok(snapshot)
    }

    async fn delete(&self, id: &NoteId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::language::Language;

    fn sample_note() -> Note {
        let mut note = Note::new(Language::default(), Some("be brief".to_string()));
        note.title = "Round trip".to_string();
        note.raw_transcription = "hello world".to_string();
        note.polished_note = "**Hello World**".to_string();
        note.audio = Some(AudioPayload::new(vec![7, 8, 9], AudioMimeType::Webm));
        note
    }

    #[tokio::test]
    async fn round_trips_all_fields() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        let note = sample_note();

        store.put(&note).await.unwrap();
        let snapshot = store.get_all().await.unwrap();

        assert_eq!(snapshot.skipped, 0);
        assert_eq!(snapshot.notes.len(), 1);
        assert_eq!(snapshot.notes[0], note);
    }

    #[tokio::test]
    async fn put_overwrites_in_place() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        let mut note = sample_note();

        store.put(&note).await.unwrap();
        note.title = "Renamed".to_string();
        note.audio = None;
        store.put(&note).await.unwrap();

        let snapshot = store.get_all().await.unwrap();
        assert_eq!(snapshot.notes.len(), 1);
        assert_eq!(snapshot.notes[0].title, "Renamed");
        assert!(snapshot.notes[0].audio.is_none());
    }

    #[tokio::test]
    async fn delete_absent_id_is_a_no_op() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        store.delete(&NoteId::from("nothing-here")).await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        let note = sample_note();

        store.put(&note).await.unwrap();
        store.delete(&note.id).await.unwrap();

        let snapshot = store.get_all().await.unwrap();
        assert!(snapshot.notes.is_empty());
    }

    #[tokio::test]
    async fn malformed_rows_are_counted_not_dropped_silently() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        store.put(&sample_note()).await.unwrap();

        // Audio blob without a MIME type
        sqlx::query(
            "INSERT INTO notes (id, title, raw_transcription, polished_note, timestamp, audio, audio_mime, target_language, custom_prompt)
             VALUES ('bad-1', 't', '', '', '2026-01-01T00:00:00Z', X'0102', NULL, 'en', NULL)",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        // Unparseable language tag
        sqlx::query(
            "INSERT INTO notes (id, title, raw_transcription, polished_note, timestamp, audio, audio_mime, target_language, custom_prompt)
             VALUES ('bad-2', 't', '', '', '2026-01-01T00:00:00Z', NULL, NULL, 'not a tag', NULL)",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let snapshot = store.get_all().await.unwrap();
        assert_eq!(snapshot.notes.len(), 1);
        assert_eq!(snapshot.skipped, 2);
    }
}
