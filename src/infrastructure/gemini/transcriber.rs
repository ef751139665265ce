//! Gemini transcriber adapter

use async_trait::async_trait;

use crate::application::ports::{ServiceError, Transcriber};
use crate::domain::audio::AudioPayload;
use crate::domain::prompt::TRANSCRIBE_INSTRUCTION;

use super::{GeminiClient, Part};

/// Transcription via the Gemini generateContent API
pub struct GeminiTranscriber {
    client: GeminiClient,
}

impl GeminiTranscriber {
    /// Create a transcriber with the default model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: GeminiClient::new(api_key),
        }
    }

    /// Use a custom model
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: GeminiClient::new(api_key).with_model(model),
        }
    }

    /// Point at a different endpoint (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl Transcriber for GeminiTranscriber {
    async fn transcribe(&self, audio: &AudioPayload) -> Result<String, ServiceError> {
        let parts = vec![
            Part::text(TRANSCRIBE_INSTRUCTION),
            Part::inline_data(audio.mime_type().as_str(), audio.to_base64()),
        ];
        self.client.generate(parts).await
    }
}
