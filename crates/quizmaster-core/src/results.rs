//! Scoring output types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::QuestionId;

/// Percentage at or above which a completed quiz earns the success cue.
pub const SUCCESS_THRESHOLD_PERCENT: f64 = 70.0;

/// Percentage below which a completed quiz earns the failure cue.
pub const FAILURE_THRESHOLD_PERCENT: f64 = 50.0;

/// How a single question was scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Incorrect,
    Unattempted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Correct => write!(f, "correct"),
            Outcome::Incorrect => write!(f, "incorrect"),
            Outcome::Unattempted => write!(f, "unattempted"),
        }
    }
}

/// Per-question timing and outcome in a result snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTiming {
    pub question_id: QuestionId,
    pub time_secs: u64,
    pub outcome: Outcome,
}

/// Which presentation cue a completed attempt has earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Threshold {
    Success,
    Failure,
    #[default]
    None,
}

impl Threshold {
    /// Classify a stored percentage. The failure cue needs at least one question.
    pub fn classify(percentage: f64, total_questions: usize) -> Self {
        if percentage >= SUCCESS_THRESHOLD_PERCENT {
            Threshold::Success
        } else if percentage < FAILURE_THRESHOLD_PERCENT && total_questions > 0 {
            Threshold::Failure
        } else {
            Threshold::None
        }
    }
}

/// Aggregate result of one completed attempt. Never mutated once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSnapshot {
    pub correct: usize,
    pub incorrect: usize,
    pub unattempted: usize,
    /// Score after negative marking, floored at zero, 2 decimals.
    pub score: f64,
    /// Total negative marks deducted, 2 decimals.
    pub negative_marks_applied: f64,
    /// 0–100, 1 decimal.
    pub percentage: f64,
    pub total_questions: usize,
    /// Mean seconds over attempted questions (0 when none attempted).
    pub avg_time_per_question: f64,
    pub per_question: Vec<QuestionTiming>,
    pub threshold: Threshold,
}

impl ResultSnapshot {
    pub fn attempted(&self) -> usize {
        self.correct + self.incorrect
    }

    /// Outcome recorded for a question, if it appears in the snapshot.
    pub fn outcome_of(&self, question_id: QuestionId) -> Option<Outcome> {
        self.per_question
            .iter()
            .find(|t| t.question_id == question_id)
            .map(|t| t.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundaries() {
        assert_eq!(Threshold::classify(70.0, 10), Threshold::Success);
        assert_eq!(Threshold::classify(100.0, 10), Threshold::Success);
        assert_eq!(Threshold::classify(69.9, 10), Threshold::None);
        assert_eq!(Threshold::classify(50.0, 10), Threshold::None);
        assert_eq!(Threshold::classify(49.9, 10), Threshold::Failure);
        assert_eq!(Threshold::classify(0.0, 0), Threshold::None);
    }

    #[test]
    fn outcome_serializes_lowercase() {
        let json = serde_json::to_string(&Outcome::Unattempted).unwrap();
        assert_eq!(json, "\"unattempted\"");
    }
}
