//! File-backed recording source
//!
//! The CLI has no microphone session of its own; a finished recording
//! arrives as an audio file on disk. "Stopping" the session reads the
//! whole file, so there is never buffered audio to lose.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{RecordingError, RecordingSource};
use crate::domain::audio::{AudioMimeType, AudioPayload};

/// Recording source that replays an audio file
pub struct FileRecordingSource {
    path: PathBuf,
}

impl FileRecordingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn mime_type(&self) -> Result<AudioMimeType, RecordingError> {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        AudioMimeType::from_extension(ext)
            .ok_or_else(|| RecordingError::UnsupportedFormat(ext.to_string()))
    }
}

#[async_trait]
impl RecordingSource for FileRecordingSource {
    async fn start(&self) -> Result<(), RecordingError> {
        if !self.path.exists() {
            return Err(RecordingError::StartFailed(format!(
                "no such file: {}",
                self.path.display()
            )));
        }
        self.mime_type()?;
        Ok(())
    }

    async fn stop(&self) -> Result<AudioPayload, RecordingError> {
        let mime_type = self.mime_type()?;
        let data = fs::read(&self.path)
            .await
            .map_err(|e| RecordingError::ReadFailed(e.to_string()))?;
        Ok(AudioPayload::new(data, mime_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_file_into_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.webm");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let source = FileRecordingSource::new(&path);
        source.start().await.unwrap();
        let payload = source.stop().await.unwrap();

        assert_eq!(payload.data(), &[1, 2, 3]);
        assert_eq!(payload.mime_type(), AudioMimeType::Webm);
    }

    #[tokio::test]
    async fn missing_file_fails_to_start() {
        let source = FileRecordingSource::new("/nonexistent/clip.webm");
        assert!(matches!(
            source.start().await,
            Err(RecordingError::StartFailed(_))
        ));
    }

    #[tokio::test]
    async fn unknown_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.txt");
        std::fs::write(&path, [0u8]).unwrap();

        let source = FileRecordingSource::new(&path);
        assert!(matches!(
            source.stop().await,
            Err(RecordingError::UnsupportedFormat(_))
        ));
    }
}
