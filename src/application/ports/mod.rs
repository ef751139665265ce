//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod polisher;
pub mod record_store;
pub mod recording;
pub mod renderer;
pub mod service;
pub mod transcriber;

// Re-export common types
pub use config::ConfigStore;
pub use polisher::Polisher;
pub use record_store::{NoteRecordStore, StorageError, StoreSnapshot};
pub use recording::{RecordingError, RecordingSource};
pub use renderer::{Renderer, StatusLevel};
pub use service::ServiceError;
pub use transcriber::Transcriber;
