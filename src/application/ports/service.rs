//! Shared error type for the remote AI services

use thiserror::Error;

/// Errors reported by the transcription and polishing services.
///
/// Only `Overloaded` is transient and worth retrying; everything else is an
/// immediate stage failure.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("service overloaded: {0}")]
    Overloaded(String),

    #[error("invalid or missing API credential")]
    BadCredential,

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("failed to parse service response: {0}")]
    MalformedResponse(String),

    #[error("service returned an empty result")]
    EmptyResult,
}

impl ServiceError {
    /// Whether the failure is a transient overload signal that the retry
    /// policy may back off and retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Overloaded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_overloaded_is_transient() {
        assert!(ServiceError::Overloaded("503".to_string()).is_transient());
        assert!(!ServiceError::BadCredential.is_transient());
        assert!(!ServiceError::RequestFailed("timeout".to_string()).is_transient());
        assert!(!ServiceError::MalformedResponse("bad json".to_string()).is_transient());
        assert!(!ServiceError::EmptyResult.is_transient());
    }
}
