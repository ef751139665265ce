//! Recording source port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioPayload;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Failed to read audio: {0}")]
    ReadFailed(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("No capture session in progress")]
    NotRecording,
}

/// Port for whatever produces finished recordings.
///
/// The core treats the source as an opaque bytes-producer. `stop` is
/// synchronous from the session's point of view: it must flush any buffered
/// audio into the returned payload before the session is considered
/// finished. Hosts whose environment can suspend them (a window being
/// hidden, the process being backgrounded) should call `stop` on that
/// signal so buffered audio is not lost to platform-level suspension.
#[async_trait]
pub trait RecordingSource: Send + Sync {
    /// Begin a capture session.
    async fn start(&self) -> Result<(), RecordingError>;

    /// End the capture session, flushing buffered audio into the payload.
    async fn stop(&self) -> Result<AudioPayload, RecordingError>;
}
