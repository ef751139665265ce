//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like SQLite and the Gemini API.

pub mod config;
pub mod gemini;
pub mod recording;
pub mod renderer;
pub mod store;

// Re-export adapters
pub use config::XdgConfigStore;
pub use gemini::{GeminiPolisher, GeminiTranscriber};
pub use recording::FileRecordingSource;
pub use renderer::{ConsoleRenderer, NullRenderer};
pub use store::{MemoryRecordStore, SqliteRecordStore};
