//! Error types shared across quizmaster.
//!
//! `QuizError` is the user-facing taxonomy the session surfaces; the other
//! enums describe failures at a single layer. `ProviderError` lives here so
//! the retry wrapper can downcast and classify errors without string
//! matching.

use thiserror::Error;

use crate::model::QuestionId;
use crate::session::Phase;

/// User-facing errors recovered at the session's phase-transition boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// A required external credential is missing. Blocks every generation
    /// attempt until resolved.
    #[error("{0}")]
    Configuration(String),

    /// The question source failed or returned unusable data.
    #[error("{0}")]
    Generation(String),

    /// Review or scoring was attempted without a valid question/answer pairing.
    #[error("{0}")]
    DataConsistency(String),
}

impl QuizError {
    /// Returns `true` if the user can simply try again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, QuizError::Generation(_))
    }

    /// Short label for log lines and console output.
    pub fn kind(&self) -> &'static str {
        match self {
            QuizError::Configuration(_) => "configuration",
            QuizError::Generation(_) => "generation",
            QuizError::DataConsistency(_) => "data consistency",
        }
    }
}

/// Errors that can occur when interacting with a question source backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response arrived but could not be turned into a quiz or deck.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_)
                | ProviderError::ModelNotFound(_)
                | ProviderError::InvalidResponse(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Rejected answer-sheet mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("no answer record for question {0}")]
    UnknownQuestion(QuestionId),

    #[error("option {index} is out of range for question {question_id}")]
    OptionOutOfRange { question_id: QuestionId, index: usize },
}

/// Rejected phase transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while in the {from} phase")]
    IllegalTransition { from: Phase, action: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_generation_failures_are_retryable() {
        assert!(QuizError::Generation("boom".into()).is_retryable());
        assert!(!QuizError::Configuration("no key".into()).is_retryable());
        assert!(!QuizError::DataConsistency("gone".into()).is_retryable());
    }

    #[test]
    fn permanent_provider_errors() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("x".into()).is_permanent());
        assert!(!ProviderError::Timeout(30).is_permanent());
        assert!(!ProviderError::RateLimited { retry_after_ms: 10 }.is_permanent());
        assert_eq!(
            ProviderError::RateLimited { retry_after_ms: 5000 }.retry_after_ms(),
            Some(5000)
        );
    }

    #[test]
    fn illegal_transition_message() {
        let err = SessionError::IllegalTransition {
            from: Phase::Input,
            action: "submit answers",
        };
        assert_eq!(err.to_string(), "cannot submit answers while in the input phase");
    }
}
