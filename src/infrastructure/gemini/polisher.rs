//! Gemini polisher adapter

use async_trait::async_trait;

use crate::application::ports::{Polisher, ServiceError};
use crate::domain::language::Language;
use crate::domain::prompt::PolishPrompt;

use super::{GeminiClient, Part};

/// Polishing via the Gemini generateContent API
pub struct GeminiPolisher {
    client: GeminiClient,
}

impl GeminiPolisher {
    /// Create a polisher with the default model
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
impl Polisher for GeminiPolisher {
    async fn polish(
        &self,
        raw_transcription: &str,
        language: &Language,
        custom_prompt: Option<&str>,
    ) -> Result<String, ServiceError> {
        let prompt = PolishPrompt::build(raw_transcription, language, custom_prompt);
        let parts = vec![Part::text(prompt.into_content())];
        self.client.generate(parts).await
    }
}
