//! VoiceNotes - voice note persistence and processing core
//!
//! This crate owns the durable record of every voice note (including binary
//! audio payloads), keeps an in-memory working set consistent with storage,
//! and drives notes through transcription and polishing against Google
//! Gemini.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Notes, audio payloads, languages, prompts, and domain errors
//! - **Application**: The note repository, the pipeline coordinator, and
//!   port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (SQLite, Gemini, config,
//!   console renderer)
//! - **CLI**: Command-line interface and command runners

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
