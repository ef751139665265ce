//! Target language value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidLanguageError;

/// Languages offered by the editor's language picker.
/// Any well-formed BCP-47 tag is accepted; this table only supplies
/// display names for the common ones.
pub const WELL_KNOWN_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish (Español)"),
    ("fr", "French (Français)"),
    ("de", "German (Deutsch)"),
    ("it", "Italian (Italiano)"),
    ("pt", "Portuguese (Português)"),
    ("fa", "Persian (فارسی)"),
    ("zh-CN", "Chinese (Simplified / 简体中文)"),
    ("ja", "Japanese (日本語)"),
    ("ko", "Korean (한국어)"),
    ("ru", "Russian (Русский)"),
    ("ar", "Arabic (العربية)"),
    ("hi", "Hindi (हिन्दी)"),
];

/// BCP-47 language tag governing the polishing output language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    code: String,
}

impl Language {
    /// The default language for new notes
    pub fn english() -> Self {
        Self {
            code: "en".to_string(),
        }
    }

    /// Get the language tag
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Get the display name, if the tag is in the well-known table.
    pub fn display_name(&self) -> Option<&'static str> {
        WELL_KNOWN_LANGUAGES
            .iter()
            .find(|(code, _)| *code == self.code)
            .map(|(_, name)| *name)
    }

    /// Name used when addressing the polishing service: display name when
    /// known, the bare tag otherwise.
    pub fn prompt_name(&self) -> &str {
        self.display_name().unwrap_or(&self.code)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl FromStr for Language {
    type Err = InvalidLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let well_formed = !trimmed.is_empty()
            && trimmed.len() <= 35
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
            && !trimmed.starts_with('-')
            && !trimmed.ends_with('-');

        if well_formed {
            Ok(Self {
                code: trimmed.to_string(),
            })
        } else {
            Err(InvalidLanguageError {
                input: s.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_english() {
        assert_eq!(Language::default().code(), "en");
    }

    #[test]
    fn well_known_has_display_name() {
        let lang: Language = "zh-CN".parse().unwrap();
        assert_eq!(
            lang.display_name(),
            Some("Chinese (Simplified / 简体中文)")
        );
        assert_eq!(lang.prompt_name(), "Chinese (Simplified / 简体中文)");
    }

    #[test]
    fn unknown_tag_falls_back_to_code() {
        let lang: Language = "pt-BR".parse().unwrap();
        assert_eq!(lang.display_name(), None);
        assert_eq!(lang.prompt_name(), "pt-BR");
    }

    #[test]
    fn parse_trims_whitespace() {
        let lang: Language = " fr ".parse().unwrap();
        assert_eq!(lang.code(), "fr");
    }

    #[test]
    fn parse_rejects_malformed_tags() {
        assert!("".parse::<Language>().is_err());
        assert!("  ".parse::<Language>().is_err());
        assert!("en_US".parse::<Language>().is_err());
        assert!("-en".parse::<Language>().is_err());
        assert!("en-".parse::<Language>().is_err());
    }
}
