//! Renderer port interface

use async_trait::async_trait;

use crate::domain::note::Note;

/// Severity of a status message shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Port for whatever displays notes to the user.
///
/// `note_updated` fires after every write-through save so the UI can
/// re-render the note's current state; `status` carries the short-lived
/// messages that replace uncaught failures (storage warnings, stage
/// progress, stage failures). The core makes no assumption about the
/// rendering technology behind this trait.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// A note changed and the change was pushed toward durable storage.
    async fn note_updated(&self, note: &Note);

    /// Show a short-lived status message.
    async fn status(&self, level: StatusLevel, message: &str);
}

/// Blanket implementation for boxed renderer types
#[async_trait]
impl Renderer for Box<dyn Renderer> {
    async fn note_updated(&self, note: &Note) {
        self.as_ref().note_updated(note).await
    }

    async fn status(&self, level: StatusLevel, message: &str) {
        self.as_ref().status(level, message).await
    }
}
