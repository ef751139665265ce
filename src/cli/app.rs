//! Command runners and application wiring

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::pipeline::PipelineError;
use crate::application::ports::{ConfigStore, RecordingSource, Renderer};
use crate::application::{
    CurrentAfterDelete, NoteDefaults, NoteRepository, PipelineCoordinator, PipelineSettings,
    PolishKind, PolishOverrides, RetryPolicy, StageOutcome,
};
use crate::domain::config::AppConfig;
use crate::domain::language::Language;
use crate::domain::note::{Note, NoteId, NoteStage};
use crate::infrastructure::{
    ConsoleRenderer, FileRecordingSource, GeminiPolisher, GeminiTranscriber, SqliteRecordStore,
    XdgConfigStore,
};

use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Parsed record options
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub db: Option<PathBuf>,
    pub file: PathBuf,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub no_polish: bool,
}

/// Parsed repolish options
#[derive(Debug, Clone)]
pub struct RepolishOptions {
    pub db: Option<PathBuf>,
    pub id: String,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub regenerate_title: bool,
}

/// Load and merge configuration: defaults < file < environment
pub async fn load_merged_config() -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    let env_config = AppConfig {
        api_key: env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    AppConfig::defaults().merge(file_config).merge(env_config)
}

/// Get the API key from the merged config
pub fn get_api_key(config: &AppConfig) -> Result<String, String> {
    config
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            "Missing API key. Set GEMINI_API_KEY or run 'voicenotes config set api_key <key>'"
                .to_string()
        })
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voicenotes")
        .join("notes.db")
}

/// Open the store and populate the repository. A failing load leaves the
/// collection empty (fail closed) and warns instead of aborting.
async fn open_repository(
    db: Option<PathBuf>,
    renderer: Arc<dyn Renderer>,
    config: &AppConfig,
    presenter: &Presenter,
) -> Result<NoteRepository, String> {
    let path = db.unwrap_or_else(default_db_path);
    let store = SqliteRecordStore::open(&path)
        .await
        .map_err(|e| format!("Failed to open note store at {}: {}", path.display(), e))?;

    let repo = NoteRepository::new(
        Arc::new(store),
        renderer,
        NoteDefaults {
            language: config.language_or_default(),
            custom_prompt: config.custom_prompt_or_default(),
        },
    );

    if let Err(e) = repo.load_all().await {
        presenter.warn(&format!(
            "Could not load stored notes ({}); starting with an empty collection",
            e
        ));
    }

    Ok(repo)
}

/// Resolve a user-supplied id or unique id prefix to a note id
async fn resolve_id(repo: &NoteRepository, input: &str) -> Result<NoteId, String> {
    let exact = NoteId::from(input);
    if repo.get(&exact).await.is_some() {
        return Ok(exact);
    }

    let mut matches: Vec<NoteId> = repo
        .list()
        .await
        .into_iter()
        .filter(|n| n.id.as_str().starts_with(input))
        .map(|n| n.id)
        .collect();

    if matches.len() > 1 {
        return Err(format!(
            "Note id prefix '{}' is ambiguous ({} matches)",
            input,
            matches.len()
        ));
    }
    matches
        .pop()
        .ok_or_else(|| format!("No note with id {}", input))
}

fn parse_language(arg: Option<String>) -> Result<Option<Language>, String> {
    match arg {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|e| format!("{}", e)),
    }
}

fn build_pipeline(
    api_key: String,
    renderer: Arc<dyn Renderer>,
    settings: PipelineSettings,
) -> PipelineCoordinator<GeminiTranscriber, GeminiPolisher> {
    PipelineCoordinator::new(
        GeminiTranscriber::new(api_key.clone()),
        GeminiPolisher::new(api_key),
        renderer,
        settings,
        RetryPolicy::default(),
    )
}

fn print_note(presenter: &Presenter, note: &Note) {
    presenter.key_value("id", note.id.as_str());
    presenter.key_value("title", &note.title);
    presenter.key_value(
        "created",
        &note.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    presenter.key_value("stage", &note.stage().to_string());
    presenter.key_value("language", note.target_language.code());
    if let Some(prompt) = &note.custom_prompt {
        presenter.key_value("custom prompt", prompt);
    }
    match &note.audio {
        Some(audio) => presenter.key_value(
            "audio",
            &format!("{} ({})", audio.human_readable_size(), audio.mime_type()),
        ),
        None => presenter.key_value("audio", "none"),
    }

    if !note.raw_transcription.is_empty() {
        presenter.section("Raw transcription");
        presenter.output(&note.raw_transcription);
    }
    if !note.polished_note.is_empty() {
        presenter.section("Polished note");
        presenter.output(&note.polished_note);
    }
}

fn exit_for_stage(stage: NoteStage) -> ExitCode {
    match stage {
        NoteStage::TranscriptionFailed | NoteStage::PolishFailed => ExitCode::from(EXIT_ERROR),
        _ => ExitCode::from(EXIT_SUCCESS),
    }
}

/// Record a new note from an audio file and run the pipeline
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let presenter = Presenter::new();
    let config = load_merged_config().await;

    let api_key = match get_api_key(&config) {
        Ok(key) => key,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let language = match parse_language(options.language) {
        Ok(language) => language,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let renderer: Arc<dyn Renderer> = Arc::new(ConsoleRenderer::new());
    let repo = match open_repository(options.db, renderer.clone(), &config, &presenter).await {
        Ok(repo) => repo,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let source = FileRecordingSource::new(&options.file);
    if let Err(e) = source.start().await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }
    let payload = match source.stop().await {
        Ok(payload) => payload,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let id = repo.create_note(language, options.prompt).await;

    let settings = PipelineSettings {
        auto_polish: config.auto_polish_or_default() && !options.no_polish,
        regenerate_title: config.regenerate_title_or_default(),
    };
    let pipeline = build_pipeline(api_key, renderer, settings);

    match pipeline.process_recording(&repo, &id, payload).await {
        Ok(StageOutcome::Completed(stage)) => {
            if let Some(note) = repo.get(&id).await {
                print_note(&presenter, &note);
            }
            exit_for_stage(stage)
        }
        Ok(StageOutcome::NoteDeleted) => {
            presenter.warn("Note was deleted before the pipeline finished");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// List notes, most recent first
pub async fn run_list(db: Option<PathBuf>) -> ExitCode {
    let presenter = Presenter::new();
    let config = load_merged_config().await;
    let renderer: Arc<dyn Renderer> = Arc::new(ConsoleRenderer::new());

    let repo = match open_repository(db, renderer, &config, &presenter).await {
        Ok(repo) => repo,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let notes = repo.list().await;
    if notes.is_empty() {
        presenter.info("No notes yet. Create one with 'voicenotes record <audio-file>'.");
        return ExitCode::from(EXIT_SUCCESS);
    }

    for note in notes {
        let short_id: String = note.id.as_str().chars().take(8).collect();
        presenter.output(&format!(
            "{}  {:<20}  {}  {}",
            short_id,
            note.stage().to_string(),
            note.timestamp.format("%Y-%m-%d %H:%M"),
            note.title,
        ));
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Show a note in full
pub async fn run_show(db: Option<PathBuf>, id: String) -> ExitCode {
    let presenter = Presenter::new();
    let config = load_merged_config().await;
    let renderer: Arc<dyn Renderer> = Arc::new(ConsoleRenderer::new());

    let repo = match open_repository(db, renderer, &config, &presenter).await {
        Ok(repo) => repo,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match resolve_id(&repo, &id).await {
        Ok(id) => {
            if let Some(note) = repo.get(&id).await {
                print_note(&presenter, &note);
                ExitCode::from(EXIT_SUCCESS)
            } else {
                presenter.error(&format!("No note with id {}", id));
                ExitCode::from(EXIT_ERROR)
            }
        }
        Err(e) => {
            presenter.error(&e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Delete a note
pub async fn run_delete(db: Option<PathBuf>, id: String) -> ExitCode {
    let presenter = Presenter::new();
    let config = load_merged_config().await;
    let renderer: Arc<dyn Renderer> = Arc::new(ConsoleRenderer::new());

    let repo = match open_repository(db, renderer, &config, &presenter).await {
        Ok(repo) => repo,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let id = match resolve_id(&repo, &id).await {
        Ok(id) => id,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match repo.delete(&id).await {
        Ok(outcome) => {
            presenter.success(&format!("Deleted note {}", id));
            match outcome {
                CurrentAfterDelete::Unchanged => {}
                CurrentAfterDelete::Switched(next) => {
                    presenter.info(&format!("Current note is now {}", next));
                }
                CurrentAfterDelete::Created(fresh) => {
                    presenter.info(&format!("Created fresh note {}", fresh));
                }
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Polish an existing note again
pub async fn run_repolish(options: RepolishOptions) -> ExitCode {
    let presenter = Presenter::new();
    let config = load_merged_config().await;

    let api_key = match get_api_key(&config) {
        Ok(key) => key,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let language = match parse_language(options.language) {
        Ok(language) => language,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let renderer: Arc<dyn Renderer> = Arc::new(ConsoleRenderer::new());
    let repo = match open_repository(options.db, renderer.clone(), &config, &presenter).await {
        Ok(repo) => repo,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let id = match resolve_id(&repo, &options.id).await {
        Ok(id) => id,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let settings = PipelineSettings {
        auto_polish: config.auto_polish_or_default(),
        regenerate_title: options.regenerate_title || config.regenerate_title_or_default(),
    };
    let pipeline = build_pipeline(api_key, renderer, settings);

    let overrides = PolishOverrides {
        language,
        custom_prompt: options.prompt,
    };
    match pipeline
        .polish(&repo, &id, overrides, PolishKind::Repolish)
        .await
    {
        Ok(StageOutcome::Completed(stage)) => {
            if let Some(note) = repo.get(&id).await {
                print_note(&presenter, &note);
            }
            exit_for_stage(stage)
        }
        Ok(StageOutcome::NoteDeleted) => {
            presenter.warn("Note was deleted before polishing finished");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e @ PipelineError::NoTranscription(_)) => {
            presenter.error(&format!("{}. Transcribe it first.", e));
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Retry transcription for a note
pub async fn run_retry(db: Option<PathBuf>, id: String) -> ExitCode {
    let presenter = Presenter::new();
    let config = load_merged_config().await;

    let api_key = match get_api_key(&config) {
        Ok(key) => key,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let renderer: Arc<dyn Renderer> = Arc::new(ConsoleRenderer::new());
    let repo = match open_repository(db, renderer.clone(), &config, &presenter).await {
        Ok(repo) => repo,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let id = match resolve_id(&repo, &id).await {
        Ok(id) => id,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let settings = PipelineSettings {
        auto_polish: config.auto_polish_or_default(),
        regenerate_title: config.regenerate_title_or_default(),
    };
    let pipeline = build_pipeline(api_key, renderer, settings);

    match pipeline.transcribe(&repo, &id).await {
        Ok(StageOutcome::Completed(stage)) => {
            if let Some(note) = repo.get(&id).await {
                print_note(&presenter, &note);
            }
            exit_for_stage(stage)
        }
        Ok(StageOutcome::NoteDeleted) => {
            presenter.warn("Note was deleted before transcription finished");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e @ PipelineError::NoAudio(_)) => {
            presenter.error(&format!("{}. Record audio for it first.", e));
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Handle the config subcommand
pub async fn run_config(action: super::args::ConfigAction) -> ExitCode {
    let presenter = Presenter::new();
    let store = XdgConfigStore::new();
    match super::config_cmd::handle_config_command(action, &store, &presenter).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}
