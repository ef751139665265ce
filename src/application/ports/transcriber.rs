//! Transcription port interface

use async_trait::async_trait;

use crate::domain::audio::AudioPayload;

use super::service::ServiceError;

/// Port for the remote transcription service
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio payload to text.
    ///
    /// # Arguments
    /// * `audio` - The recorded audio, bytes plus MIME type
    ///
    /// # Returns
    /// The transcribed text or a service error
    async fn transcribe(&self, audio: &AudioPayload) -> Result<String, ServiceError>;
}
