//! Question source backed by a TOML quiz file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;

use quizmaster_core::model::Quiz;
use quizmaster_core::parser::parse_quiz_file;
use quizmaster_core::traits::{ModelInfo, QuestionSource, QuizRequest};

/// Serves a pre-written quiz from disk. The request's topic and count are
/// ignored; the file is re-read on every call.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn generate_quiz(&self, _request: &QuizRequest) -> anyhow::Result<Quiz> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || parse_quiz_file(&path))
            .await
            .context("quiz file loader panicked")?
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        Vec::new()
    }
}
