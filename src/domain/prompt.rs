//! Prompt value objects for the transcription and polishing services

use crate::domain::language::Language;

/// Instruction sent alongside the audio payload
pub const TRANSCRIBE_INSTRUCTION: &str =
    "Generate a complete, detailed transcript of this audio.";

/// Shared preamble for both polishing variants
const POLISH_PREAMBLE: &str = "You are an expert note-taking assistant.";

/// Closing constraint appended to every polishing prompt
fn polish_output_constraint(language_name: &str) -> String {
    format!(
        "Your final output MUST ONLY be the polished note in {}, formatted in markdown.\n\
         Do NOT include any introductory phrases, explanations, or any text other than the requested note itself.",
        language_name
    )
}

/// Value object holding the complete prompt for one polishing pass.
/// Combines the target language, the default cleanup checklist or the
/// user's custom instructions, and the raw transcription itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolishPrompt {
    content: String,
}

impl PolishPrompt {
    /// Build the polishing prompt for a raw transcription
    pub fn build(raw_transcription: &str, language: &Language, custom_prompt: Option<&str>) -> Self {
        let name = language.prompt_name();
        let content = match custom_prompt.filter(|p| !p.trim().is_empty()) {
            Some(instructions) => format!(
                "{preamble}\n\
                 First, mentally translate the following raw audio transcription into {name} ({code}).\n\
                 Then, take the {name} translation and apply the user-provided instructions below.\n\
                 {constraint}\n\
                 \n\
                 User Instructions:\n\
                 {instructions}\n\
                 \n\
                 Raw transcription:\n\
                 {raw}",
                preamble = POLISH_PREAMBLE,
                name = name,
                code = language.code(),
                constraint = polish_output_constraint(name),
                instructions = instructions.trim(),
                raw = raw_transcription,
            ),
            None => format!(
                "{preamble}\n\
                 First, mentally translate the following raw audio transcription into {name} ({code}).\n\
                 Then, take the {name} translation and perform the following:\n\
                 - Create a polished, well-formatted note.\n\
                 - Remove filler words (e.g., um, uh, like), unnecessary repetitions, and false starts.\n\
                 - Correct grammar and improve sentence structure.\n\
                 - Format the content logically using markdown (e.g., headings for topics, bullet/numbered lists for items).\n\
                 - Ensure all original meaning and key information from the transcription are preserved.\n\
                 {constraint}\n\
                 \n\
                 Raw transcription:\n\
                 {raw}",
                preamble = POLISH_PREAMBLE,
                name = name,
                code = language.code(),
                constraint = polish_output_constraint(name),
                raw = raw_transcription,
            ),
        };
        Self { content }
    }

    /// Get the prompt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the content
    pub fn into_content(self) -> String {
        self.content
    }
}
