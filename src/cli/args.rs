//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// VoiceNotes - voice note manager using Google Gemini
#[derive(Parser, Debug)]
#[command(name = "voicenotes")]
#[command(version)]
#[command(about = "Record, transcribe, and polish voice notes using Google Gemini")]
#[command(long_about = None)]
pub struct Cli {
    /// Override the note database path
    #[arg(long, value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a note from a finished recording and run the pipeline
    Record {
        /// Audio file holding the recording (webm, ogg, mp3, wav, mp4, flac)
        file: PathBuf,

        /// Polishing output language (BCP-47 tag, e.g. en, fr, zh-CN)
        #[arg(short, long, value_name = "TAG")]
        language: Option<String>,

        /// Custom polishing instructions for this note
        #[arg(short, long, value_name = "TEXT")]
        prompt: Option<String>,

        /// Stop after transcription instead of polishing automatically
        #[arg(long)]
        no_polish: bool,
    },
    /// List notes, most recent first
    List,
    /// Show a note in full
    Show {
        /// Note id (a unique prefix is enough)
        id: String,
    },
    /// Delete a note
    Delete {
        /// Note id (a unique prefix is enough)
        id: String,
    },
    /// Polish a note again, optionally with a new language or prompt
    Repolish {
        /// Note id (a unique prefix is enough)
        id: String,

        /// Polishing output language (BCP-47 tag)
        #[arg(short, long, value_name = "TAG")]
        language: Option<String>,

        /// Custom polishing instructions replacing the stored ones
        #[arg(short, long, value_name = "TEXT")]
        prompt: Option<String>,

        /// Derive a fresh title from the new polished text
        #[arg(long)]
        regenerate_title: bool,
    },
    /// Retry transcription for a note whose transcription failed
    Retry {
        /// Note id (a unique prefix is enough)
        id: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "language",
    "auto_polish",
    "custom_prompt",
    "regenerate_title",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
