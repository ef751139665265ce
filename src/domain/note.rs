//! Note entity and lifecycle stages

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::audio::AudioPayload;
use crate::domain::language::Language;

/// Prefix marking a failed transcription. Written into `raw_transcription`
/// so a reload can tell "failed" apart from "not yet attempted", and so the
/// polishing stage refuses to run on it.
pub const TRANSCRIPTION_FAILED_SENTINEL: &str = "[transcription failed]";

/// Prefix marking a failed polishing pass, written into `polished_note`.
pub const POLISH_FAILED_SENTINEL: &str = "[polishing failed]";

/// Build the sentinel text for a failed transcription
pub fn transcription_failure(reason: &str) -> String {
    format!("{} {}", TRANSCRIPTION_FAILED_SENTINEL, reason)
}

/// Build the sentinel text for a failed polishing pass
pub fn polish_failure(reason: &str) -> String {
    format!("{} {}", POLISH_FAILED_SENTINEL, reason)
}

/// Opaque note identifier. Assigned at creation, immutable, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(String);

impl NoteId {
    /// Allocate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Resting lifecycle stage of a note, derived from its durable fields.
/// The in-flight phases (transcribing, polishing) are reported through the
/// renderer while a pipeline runs and are never persisted; after a crash or
/// reload the stage recomputes from what actually made it to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteStage {
    Empty,
    Captured,
    Transcribed,
    TranscriptionFailed,
    Polished,
    PolishFailed,
}

impl fmt::Display for NoteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Empty => "empty",
            Self::Captured => "captured",
            Self::Transcribed => "transcribed",
            Self::TranscriptionFailed => "transcription-failed",
            Self::Polished => "polished",
            Self::PolishFailed => "polish-failed",
        };
        write!(f, "{}", label)
    }
}

/// The persisted unit: audio, transcript, polished text and settings for
/// one voice note.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub raw_transcription: String,
    pub polished_note: String,
    pub timestamp: DateTime<Utc>,
    pub audio: Option<AudioPayload>,
    pub target_language: Language,
    pub custom_prompt: Option<String>,
}

impl Note {
    /// Create an empty note with a fresh id, stamped now
    pub fn new(target_language: Language, custom_prompt: Option<String>) -> Self {
        let timestamp = Utc::now();
        Self {
            id: NoteId::generate(),
            title: default_title(timestamp),
            raw_transcription: String::new(),
            polished_note: String::new(),
            timestamp,
            audio: None,
            target_language,
            custom_prompt,
        }
    }

    /// Derive the resting stage from the durable fields
    pub fn stage(&self) -> NoteStage {
        if !self.polished_note.is_empty() {
            if self.polish_failed() {
                NoteStage::PolishFailed
            } else {
                NoteStage::Polished
            }
        } else if !self.raw_transcription.is_empty() {
            if self.transcription_failed() {
                NoteStage::TranscriptionFailed
            } else {
                NoteStage::Transcribed
            }
        } else if self.audio.is_some() {
            NoteStage::Captured
        } else {
            NoteStage::Empty
        }
    }

    /// Whether the transcription field carries the failure sentinel
    pub fn transcription_failed(&self) -> bool {
        self.raw_transcription
            .starts_with(TRANSCRIPTION_FAILED_SENTINEL)
    }

    /// Whether the polished field carries the failure sentinel
    pub fn polish_failed(&self) -> bool {
        self.polished_note.starts_with(POLISH_FAILED_SENTINEL)
    }

    /// Whether the note has a transcription the polishing stage may consume:
    /// non-empty and not a failure sentinel.
    pub fn has_usable_transcription(&self) -> bool {
        !self.raw_transcription.trim().is_empty() && !self.transcription_failed()
    }
}

/// Title given to a freshly created note
pub fn default_title(timestamp: DateTime<Utc>) -> String {
    format!("Note {}", timestamp.format("%H:%M"))
}

/// Title used when nothing usable can be derived from the polished text
pub fn fallback_title(timestamp: DateTime<Utc>) -> String {
    format!("Note from {}", timestamp.format("%b %-d, %Y %H:%M"))
}

/// Derive a title from polished markdown: the first heading wins; failing
/// that, the first line stripped of markdown punctuation, truncated to 60
/// characters. Returns None when no line yields a usable title.
pub fn derive_title(markdown: &str) -> Option<String> {
    const MAX_LEN: usize = 60;

    for line in markdown.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix('#') {
            let heading = rest.trim_start_matches('#').trim();
            if !heading.is_empty() {
                return Some(heading.to_string());
            }
        }
    }

    for line in markdown.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        let candidate = line
            .trim_start_matches(is_markdown_decoration)
            .trim_end_matches(['*', '_', '`', '#'])
            .trim();
        if candidate.chars().count() > 3 {
            let truncated: String = candidate.chars().take(MAX_LEN).collect();
            if candidate.chars().count() > MAX_LEN {
                return Some(format!("{}...", truncated));
            }
            return Some(truncated);
        }
    }

    None
}

fn is_markdown_decoration(c: char) -> bool {
    matches!(
        c,
        '*' | '_' | '`' | '#' | '-' | '>' | '[' | ']' | '(' | ')' | '.'
    ) || c.is_ascii_digit()
        || c.is_whitespace()
}
