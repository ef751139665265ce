//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::language::Language;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub auto_polish: Option<bool>,
    pub custom_prompt: Option<String>,
    pub regenerate_title: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            language: Some("en".to_string()),
            auto_polish: Some(true),
            custom_prompt: None,
            regenerate_title: Some(false),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            language: other.language.or(self.language),
            auto_polish: other.auto_polish.or(self.auto_polish),
            custom_prompt: other.custom_prompt.or(self.custom_prompt),
            regenerate_title: other.regenerate_title.or(self.regenerate_title),
        }
    }

    /// Get the target language as a parsed tag, or English if not set/invalid
    pub fn language_or_default(&self) -> Language {
        self.language
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get the auto-polish setting, or true if not set
    pub fn auto_polish_or_default(&self) -> bool {
        self.auto_polish.unwrap_or(true)
    }

    /// Get the title regeneration policy, or false if not set
    pub fn regenerate_title_or_default(&self) -> bool {
        self.regenerate_title.unwrap_or(false)
    }

    /// Get the stored default polishing instructions, trimmed, if any
    pub fn custom_prompt_or_default(&self) -> Option<String> {
        self.custom_prompt
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}
