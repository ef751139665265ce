//! Recording source adapters

pub mod file;

pub use file::FileRecordingSource;
