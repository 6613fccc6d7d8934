//! Attempt reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AnswerRecord, Language, Question};
use crate::results::ResultSnapshot;
use crate::session::ReviewView;

/// A completed attempt: the questions, the answers given, and the score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub language: Language,
    pub questions: Vec<Question>,
    pub answers: Vec<AnswerRecord>,
    pub result: ResultSnapshot,
}

impl AttemptReport {
    /// Snapshot a finished attempt.
    pub fn from_view(view: ReviewView<'_>, language: Language) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            title: view.quiz.title.clone(),
            language,
            questions: view.quiz.questions.clone(),
            answers: view.answers.records().to_vec(),
            result: view.result.clone(),
        }
    }

    /// Default file name, e.g. `attempt-20250101-120000.json`.
    pub fn file_name(&self) -> String {
        format!("attempt-{}.json", self.created_at.format("%Y%m%d-%H%M%S"))
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AttemptReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
