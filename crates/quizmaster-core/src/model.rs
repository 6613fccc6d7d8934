//! Core data model types for quizmaster.
//!
//! These are the fundamental types the whole system uses to represent
//! generated questions, quizzes, and the per-question answer records
//! captured while a quiz is being taken.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a question, unique within a quiz.
pub type QuestionId = u32;

/// Every question carries exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// Marks deducted for each attempted-but-incorrect answer.
pub const NEGATIVE_MARKING_PER_QUESTION: f64 = 1.0 / 3.0;

/// Default number of questions to request from a question source.
pub const DEFAULT_QUESTION_COUNT: u32 = 50;

/// Question counts offered to the user.
pub const QUESTION_COUNT_OPTIONS: [u32; 4] = [25, 50, 75, 100];

/// Total time for a quiz of `DEFAULT_QUESTION_COUNT` questions.
pub const QUIZ_TOTAL_TIME_SECS: u64 = 30 * 60;

/// Time allowance for a quiz with `question_count` questions, scaled from
/// `QUIZ_TOTAL_TIME_SECS` and rounded down to whole seconds.
pub fn time_allowance_secs(question_count: usize) -> u64 {
    question_count as u64 * QUIZ_TOTAL_TIME_SECS / DEFAULT_QUESTION_COUNT as u64
}

/// A single multiple-choice question. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within its quiz.
    pub id: QuestionId,
    /// The question prompt.
    pub text: String,
    /// Optional source reference (book, article, exam paper).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Exactly `OPTION_COUNT` option strings.
    pub options: Vec<String>,
    /// 0-based index of the correct option.
    pub correct_index: usize,
    /// Why the correct option is correct.
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    /// Text of the correct option, if the index is in range.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

/// A titled, ordered question set as returned by a question source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub title: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Target language for generated questions and instruction text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en", alias = "english")]
    English,
    #[default]
    #[serde(rename = "hi", alias = "hindi")]
    Hindi,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    /// English name, as sent to question sources.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिन्दी",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "hi" | "hindi" => Ok(Language::Hindi),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// Visitation and marking status of a question, as shown on a question palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionStatus {
    #[default]
    NotVisited,
    NotAnswered,
    Answered,
    MarkedForReview,
    AnsweredAndMarked,
}

impl QuestionStatus {
    /// Status implied by a selection state and a review mark.
    pub fn derive(answered: bool, marked: bool) -> Self {
        match (answered, marked) {
            (true, true) => QuestionStatus::AnsweredAndMarked,
            (true, false) => QuestionStatus::Answered,
            (false, true) => QuestionStatus::MarkedForReview,
            (false, false) => QuestionStatus::NotAnswered,
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuestionStatus::NotVisited => "not visited",
            QuestionStatus::NotAnswered => "not answered",
            QuestionStatus::Answered => "answered",
            QuestionStatus::MarkedForReview => "marked for review",
            QuestionStatus::AnsweredAndMarked => "answered & marked",
        };
        f.write_str(label)
    }
}

/// Per-question state captured while a quiz is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    /// `None` means unattempted.
    pub selected_option: Option<usize>,
    /// Cumulative seconds spent on this question.
    pub time_spent_secs: u64,
    pub status: QuestionStatus,
    pub is_marked: bool,
}

impl AnswerRecord {
    /// A fresh record: unattempted, not visited, no time spent.
    pub fn new(question_id: QuestionId) -> Self {
        Self {
            question_id,
            selected_option: None,
            time_spent_secs: 0,
            status: QuestionStatus::NotVisited,
            is_marked: false,
        }
    }

    pub fn is_attempted(&self) -> bool {
        self.selected_option.is_some()
    }
}

/// Branding carried by exported documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub app_name: String,
    pub youtube_link: String,
    pub telegram_link: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            app_name: "Apni Taiyarii".to_string(),
            youtube_link: "https://www.youtube.com/@apnitaiyarii".to_string(),
            telegram_link: "https://t.me/apnitaiyarii".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_display_and_parse() {
        assert_eq!(Language::English.to_string(), "en");
        assert_eq!(Language::Hindi.to_string(), "hi");
        assert_eq!("english".parse::<Language>().unwrap(), Language::English);
        assert_eq!("HI".parse::<Language>().unwrap(), Language::Hindi);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::Hindi);
    }

    #[test]
    fn time_allowance_scales_with_count() {
        assert_eq!(time_allowance_secs(50), 1800);
        assert_eq!(time_allowance_secs(25), 900);
        assert_eq!(time_allowance_secs(100), 3600);
        assert_eq!(time_allowance_secs(1), 36);
        assert_eq!(time_allowance_secs(0), 0);
    }

    #[test]
    fn status_derivation() {
        assert_eq!(QuestionStatus::derive(true, false), QuestionStatus::Answered);
        assert_eq!(
            QuestionStatus::derive(true, true),
            QuestionStatus::AnsweredAndMarked
        );
        assert_eq!(
            QuestionStatus::derive(false, true),
            QuestionStatus::MarkedForReview
        );
        assert_eq!(QuestionStatus::derive(false, false), QuestionStatus::NotAnswered);
    }

    #[test]
    fn status_serializes_camel_case() {
        let json = serde_json::to_string(&QuestionStatus::AnsweredAndMarked).unwrap();
        assert_eq!(json, "\"answeredAndMarked\"");
    }

    #[test]
    fn fresh_answer_record() {
        let record = AnswerRecord::new(7);
        assert_eq!(record.question_id, 7);
        assert!(!record.is_attempted());
        assert_eq!(record.status, QuestionStatus::NotVisited);
        assert_eq!(record.time_spent_secs, 0);
    }

    #[test]
    fn question_serde_roundtrip() {
        let q = Question {
            id: 1,
            text: "Capital of France?".into(),
            reference: None,
            options: vec!["Paris".into(), "Rome".into(), "Oslo".into(), "Bern".into()],
            correct_index: 0,
            explanation: "Paris is the capital.".into(),
        };
        let json = serde_json::to_string(&q).unwrap();
        assert!(!json.contains("reference"));
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
        assert_eq!(back.correct_option(), Some("Paris"));
    }
}
