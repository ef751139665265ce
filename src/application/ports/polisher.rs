//! Polishing port interface

use async_trait::async_trait;

use crate::domain::language::Language;

use super::service::ServiceError;

/// Port for the remote polishing service.
///
/// Given the same inputs the service is not required to be deterministic;
/// callers may only rely on the write-through contract, not on content
/// idempotence.
#[async_trait]
pub trait Polisher: Send + Sync {
    /// Turn a raw transcription into a polished, formatted note.
    ///
    /// # Arguments
    /// * `raw_transcription` - Output of the transcription stage
    /// * `language` - BCP-47 tag the polished note must be written in
    /// * `custom_prompt` - Optional user instructions replacing the default
    ///   cleanup checklist
    ///
    /// # Returns
    /// The polished markdown or a service error
    async fn polish(
        &self,
        raw_transcription: &str,
        language: &Language,
        custom_prompt: Option<&str>,
    ) -> Result<String, ServiceError>;
}
