//! Console renderer adapter

use std::sync::Mutex;

use async_trait::async_trait;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::{Renderer, StatusLevel};
use crate::domain::note::Note;

/// Renderer that shows pipeline status on stderr.
///
/// Info-level messages drive a single spinner line, the way the editor's
/// status bar swaps its text as stages progress; success and error finish
/// the spinner, warnings print above it. Re-render notifications carry no
/// terminal output of their own (the CLI prints the note when a command
/// finishes), so they only leave a trace entry.
#[derive(Default)]
pub struct ConsoleRenderer {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn make_spinner(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        spinner
    }
}

#[async_trait]
impl Renderer for ConsoleRenderer {
    async fn note_updated(&self, note: &Note) {
        tracing::debug!(id = %note.id, stage = %note.stage(), "note updated");
    }

    async fn status(&self, level: StatusLevel, message: &str) {
        let Ok(mut guard) = self.spinner.lock() else {
            eprintln!("{}", message);
            return;
        };

        match level {
            StatusLevel::Info => match guard.as_ref() {
                Some(spinner) => spinner.set_message(message.to_string()),
                None => *guard = Some(Self::make_spinner(message)),
            },
            StatusLevel::Success => match guard.take() {
                Some(spinner) => {
                    spinner.finish_with_message(format!("{} {}", "✓".green(), message))
                }
                None => eprintln!("{} {}", "✓".green(), message),
            },
            StatusLevel::Warning => match guard.as_ref() {
                Some(spinner) => spinner.println(format!("{} {}", "⚠".yellow(), message)),
                None => eprintln!("{} {}", "⚠".yellow(), message),
            },
            StatusLevel::Error => match guard.take() {
                Some(spinner) => {
                    spinner.finish_with_message(format!("{} {}", "✗".red(), message))
                }
                None => eprintln!("{} {}", "✗".red(), message),
            },
        }
    }
}
