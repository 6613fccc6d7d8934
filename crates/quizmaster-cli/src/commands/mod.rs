//! Subcommand implementations and the plumbing they share.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use quizmaster_core::model::QUESTION_COUNT_OPTIONS;
use quizmaster_core::session::{QuizSession, SessionObserver, SessionSettings};
use quizmaster_core::traits::QuizInput;
use quizmaster_providers::config::{load_config_from, source_from_config, QuizmasterConfig};

use crate::{InputArgs, SourceArgs};

pub mod generate;
pub mod init;
pub mod list_models;
pub mod present;
pub mod take;
pub mod validate;

/// Loaded config with command-line overrides applied.
pub struct Setup {
    pub config: QuizmasterConfig,
    pub settings: SessionSettings,
    pub output_dir: PathBuf,
    pub provider: Option<String>,
}

impl Setup {
    pub fn load(args: &SourceArgs, questions: Option<u32>) -> Result<Self> {
        let config = load_config_from(args.config.as_deref())?;

        let mut settings = config.session_settings();
        if let Some(language) = args.language {
            settings.language = language;
        }
        if let Some(model) = &args.model {
            settings.model = model.clone();
        }
        if let Some(count) = questions {
            anyhow::ensure!(
                QUESTION_COUNT_OPTIONS.contains(&count),
                "question count must be one of {QUESTION_COUNT_OPTIONS:?}"
            );
            settings.question_count = count;
        }

        let output_dir = args
            .output
            .clone()
            .unwrap_or_else(|| config.output_dir.clone());

        Ok(Self {
            config,
            settings,
            output_dir,
            provider: args.provider.clone(),
        })
    }

    /// A session over the configured provider. A missing key still yields a
    /// session; it reports the configuration error on every generation attempt.
    pub fn session(&self, observer: Arc<dyn SessionObserver>) -> QuizSession {
        let session = match source_from_config(&self.config, self.provider.as_deref()) {
            Ok(source) => QuizSession::new(source, self.settings.clone()),
            Err(e) => QuizSession::unconfigured(e, self.settings.clone()),
        };
        session.with_observer(observer)
    }
}

/// Turn `--topic` / `--text-file` into a generation input.
pub fn read_input(args: &InputArgs) -> Result<Option<QuizInput>> {
    if let Some(topic) = &args.topic {
        return Ok(Some(QuizInput::Topic(topic.clone())));
    }
    match &args.text_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read text file: {}", path.display()))?;
            Ok(Some(QuizInput::Text {
                text,
                instructions: args.instructions.clone(),
            }))
        }
        None => Ok(None),
    }
}
