//! Processing pipeline coordinator
//!
//! Drives a note through capture → transcription → polishing. Every stage
//! writes its result back through the repository before the next stage
//! begins, so a crash or reload never loses completed work. This is the
//! only component that talks to the remote AI services.

use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::{
    Polisher, Renderer, ServiceError, StatusLevel, Transcriber,
};
use crate::application::repository::{NoteRepository, RepositoryError};
use crate::application::retry::{retry_transient, RetryPolicy};
use crate::domain::audio::AudioPayload;
use crate::domain::language::Language;
use crate::domain::note::{self, Note, NoteId, NoteStage};

/// Guard violations and coordination bugs. These propagate to the caller;
/// runtime failures (storage, services) never surface here; they become
/// sentinels and status messages instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("note {0} has no audio payload to transcribe")]
    NoAudio(NoteId),

    #[error("note {0} has no usable transcription to polish")]
    NoTranscription(NoteId),

    #[error("recording produced no audio data")]
    EmptyCapture,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Pipeline toggles sourced from settings
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Polish automatically once transcription succeeds
    pub auto_polish: bool,
    /// Re-derive the title on user-triggered re-polish as well.
    /// The initial polish always derives one.
    pub regenerate_title: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            auto_polish: true,
            regenerate_title: false,
        }
    }
}

/// How a stage run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage result was written through; the note rests at this stage
    Completed(NoteStage),
    /// The note was deleted while a service call was in flight; the late
    /// result was dropped
    NoteDeleted,
}

/// Per-call replacements for the note's stored polishing settings
#[derive(Debug, Clone, Default)]
pub struct PolishOverrides {
    pub language: Option<Language>,
    pub custom_prompt: Option<String>,
}

/// Whether a polish run is the pipeline's own follow-up to transcription
/// or a user-triggered re-polish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolishKind {
    Initial,
    Repolish,
}

/// Coordinates the per-note lifecycle against the remote services.
///
/// Holds note ids only, never references into the collection, so nothing
/// goes stale across suspension points.
pub struct PipelineCoordinator<T, P>
where
    T: Transcriber,
    P: Polisher,
{
    transcriber: T,
    polisher: P,
    renderer: Arc<dyn Renderer>,
    settings: PipelineSettings,
    retry: RetryPolicy,
}

impl<T, P> PipelineCoordinator<T, P>
where
    T: Transcriber,
    P: Polisher,
{
    pub fn new(
        transcriber: T,
        polisher: P,
        renderer: Arc<dyn Renderer>,
        settings: PipelineSettings,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transcriber,
            polisher,
            renderer,
            settings,
            retry,
        }
    }

    /// Attach a finished recording to a note. The new payload fully
    /// replaces any prior recording and resets both text fields, since
    /// they described audio that no longer exists.
    pub async fn attach_capture(
        &self,
        repo: &NoteRepository,
        id: &NoteId,
        payload: AudioPayload,
    ) -> Result<(), PipelineError> {
        if payload.is_empty() {
            self.renderer
                .status(
                    StatusLevel::Warning,
                    "No audio data captured. Please try again.",
                )
                .await;
            return Err(PipelineError::EmptyCapture);
        }

        repo.update(id, |n| {
            n.audio = Some(payload);
            n.raw_transcription.clear();
            n.polished_note.clear();
        })
        .await?;
        Ok(())
    }

    /// Full pipeline for a finished recording: attach the payload, then
    /// transcribe (and polish, when auto-polish is on).
    pub async fn process_recording(
        &self,
        repo: &NoteRepository,
        id: &NoteId,
        payload: AudioPayload,
    ) -> Result<StageOutcome, PipelineError> {
        self.attach_capture(repo, id, payload).await?;
        self.transcribe(repo, id).await
    }

    /// Run the transcription stage. Requires an audio payload; invoking
    /// this without one is a programming error, not a silent no-op.
    pub async fn transcribe(
        &self,
        repo: &NoteRepository,
        id: &NoteId,
    ) -> Result<StageOutcome, PipelineError> {
        let note = repo
            .get(id)
            .await
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        let audio = note.audio.ok_or_else(|| PipelineError::NoAudio(id.clone()))?;

        self.renderer
            .status(StatusLevel::Info, "Getting transcription...")
            .await;

        let result = retry_transient(&self.retry, || self.transcriber.transcribe(&audio))
            .await
            .and_then(|text| {
                let trimmed = text.trim().to_string();
                if trimmed.is_empty() {
                    Err(ServiceError::EmptyResult)
                } else {
                    Ok(trimmed)
                }
            });

        match result {
            Ok(text) => {
                if self.write_back(repo, id, |n| n.raw_transcription = text).await {
                    return Ok(StageOutcome::NoteDeleted);
                }
                self.renderer
                    .status(StatusLevel::Success, "Transcription complete.")
                    .await;
                if self.settings.auto_polish {
                    self.polish(repo, id, PolishOverrides::default(), PolishKind::Initial)
                        .await
                } else {
                    Ok(StageOutcome::Completed(NoteStage::Transcribed))
                }
            }
            Err(e) => {
                let sentinel = note::transcription_failure(&e.to_string());
                if self
                    .write_back(repo, id, |n| {
                        n.raw_transcription = sentinel;
                        n.polished_note.clear();
                    })
                    .await
                {
                    return Ok(StageOutcome::NoteDeleted);
                }
                self.report_stage_failure("Transcription", &e).await;
                Ok(StageOutcome::Completed(NoteStage::TranscriptionFailed))
            }
        }
    }

    /// Run the polishing stage. Requires a non-empty, non-sentinel
    /// transcription; polishing a failed transcription is a programming
    /// error. Re-enterable: a re-polish may carry a different language or
    /// custom prompt, which is persisted before the service call so the
    /// user's choice survives a failure.
    pub async fn polish(
        &self,
        repo: &NoteRepository,
        id: &NoteId,
        overrides: PolishOverrides,
        kind: PolishKind,
    ) -> Result<StageOutcome, PipelineError> {
        let note = repo
            .get(id)
            .await
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        if !note.has_usable_transcription() {
            return Err(PipelineError::NoTranscription(id.clone()));
        }

        if overrides.language.is_some() || overrides.custom_prompt.is_some() {
            let PolishOverrides {
                language,
                custom_prompt,
            } = overrides;
            repo.update(id, |n| {
                if let Some(language) = language {
                    n.target_language = language;
                }
                if let Some(prompt) = custom_prompt {
                    n.custom_prompt = Some(prompt);
                }
            })
            .await?;
        }

        let note = repo
            .get(id)
            .await
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        let raw = note.raw_transcription;
        let language = note.target_language;
        let custom_prompt = note.custom_prompt;

        self.renderer
            .status(StatusLevel::Info, "Polishing note...")
            .await;

        let result = retry_transient(&self.retry, || {
            self.polisher.polish(&raw, &language, custom_prompt.as_deref())
        })
        .await
        .and_then(|text| {
            let trimmed = text.trim().to_string();
            if trimmed.is_empty() {
                Err(ServiceError::EmptyResult)
            } else {
                Ok(trimmed)
            }
        });

        match result {
            Ok(text) => {
                let derived = note::derive_title(&text);
                let set_title = kind == PolishKind::Initial || self.settings.regenerate_title;
                if self
                    .write_back(repo, id, |n| {
                        n.polished_note = text;
                        if set_title {
                            if let Some(title) = derived {
                                n.title = title;
                            } else if n.title.starts_with("Note ") {
                                n.title = note::fallback_title(n.timestamp);
                            }
                        }
                    })
                    .await
                {
                    return Ok(StageOutcome::NoteDeleted);
                }
                self.renderer
                    .status(
                        StatusLevel::Success,
                        "Note polished. Ready for next recording.",
                    )
                    .await;
                Ok(StageOutcome::Completed(NoteStage::Polished))
            }
            Err(e) => {
                let sentinel = note::polish_failure(&e.to_string());
                if self
                    .write_back(repo, id, |n| n.polished_note = sentinel)
                    .await
                {
                    return Ok(StageOutcome::NoteDeleted);
                }
                self.report_stage_failure("Polishing", &e).await;
                Ok(StageOutcome::Completed(NoteStage::PolishFailed))
            }
        }
    }

    /// Write a stage result back through the repository. Returns true when
    /// the note vanished while the service call was in flight; the result
    /// is dropped and the caller reports `NoteDeleted`. The store row a
    /// racing save may have left behind is harmless: the in-memory
    /// collection is the rendering source of truth and no longer references
    /// that id.
    async fn write_back<F>(&self, repo: &NoteRepository, id: &NoteId, mutate: F) -> bool
    where
        F: FnOnce(&mut Note),
    {
        match repo.update(id, mutate).await {
            Ok(()) => false,
            Err(RepositoryError::NotFound(_)) => {
                tracing::debug!(id = %id, "note deleted mid-pipeline; dropping stage result");
                true
            }
        }
    }

    async fn report_stage_failure(&self, stage: &str, error: &ServiceError) {
        let message = match error {
            ServiceError::BadCredential => format!(
                "{} failed: invalid API credential. Update it with 'voicenotes config set api_key <key>'.",
                stage
            ),
            e if e.is_transient() => {
                format!("{} failed after repeated attempts: {}", stage, e)
            }
            e => format!("{} failed: {}", stage, e),
        };
        self.renderer.status(StatusLevel::Error, &message).await;
    }
}
