//! No-op renderer adapter

use async_trait::async_trait;

use crate::application::ports::{Renderer, StatusLevel};
use crate::domain::note::Note;

/// Renderer that swallows everything. Useful in tests and for headless
/// callers that read repository state directly.
#[derive(Default)]
pub struct NullRenderer;

impl NullRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Renderer for NullRenderer {
    async fn note_updated(&self, _note: &Note) {}

    async fn status(&self, _level: StatusLevel, _message: &str) {}
}
