//! Core trait definitions for question sources.
//!
//! These async traits are implemented by the `quizmaster-providers` crate.
//! A source turns a topic or pasted text into a titled list of
//! multiple-choice questions, and optionally into a slide deck.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{Language, Quiz};
use crate::slides::SlideDeck;

/// Trait for backends that generate quizzes.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate a quiz. Implementations return the parsed quiz; the session
    /// validates it before accepting it.
    async fn generate_quiz(&self, request: &QuizRequest) -> anyhow::Result<Quiz>;

    /// Generate a presentation deck. Not every source can.
    async fn generate_presentation(
        &self,
        request: &PresentationRequest,
    ) -> anyhow::Result<SlideDeck> {
        let _ = request;
        anyhow::bail!("{} cannot generate presentations", self.name())
    }

    /// List available models for this source.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// What the user asked a quiz to be about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum QuizInput {
    /// A short topic, e.g. "Indian constitution".
    Topic(String),
    /// Pasted source text, with optional extra instructions for the generator.
    Text {
        text: String,
        #[serde(default)]
        instructions: Option<String>,
    },
}

impl QuizInput {
    /// A short label for logs and fallback titles.
    pub fn label(&self) -> String {
        match self {
            QuizInput::Topic(topic) => topic.trim().to_string(),
            QuizInput::Text { .. } => "Pasted Text Content".to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            QuizInput::Topic(topic) => topic.trim().is_empty(),
            QuizInput::Text { text, .. } => text.trim().is_empty(),
        }
    }
}

/// Request to generate a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRequest {
    /// Model identifier (e.g. "gemini-2.5-flash").
    pub model: String,
    pub input: QuizInput,
    /// How many questions to ask for.
    pub question_count: u32,
    pub language: Language,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Request to generate a slide deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationRequest {
    pub model: String,
    pub input: QuizInput,
    pub language: Language,
    pub temperature: f64,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}
