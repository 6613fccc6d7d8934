//! Response handling shared by the HTTP-backed sources.

use quizmaster_core::error::ProviderError;
use quizmaster_core::parser::{parse_presentation_response, parse_quiz_response};
use quizmaster_core::model::Quiz;
use quizmaster_core::slides::SlideDeck;
use quizmaster_core::traits::QuizInput;

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub(crate) fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("failed to build HTTP client")
}

pub(crate) fn send_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
    } else {
        ProviderError::NetworkError(e.to_string())
    }
}

/// Map non-success HTTP statuses to provider errors.
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();
    if status < 400 {
        return Ok(response);
    }
    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5)
            .saturating_mul(1000);
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry_after,
        });
    }
    let body = response.text().await.unwrap_or_default();
    Err(match status {
        401 | 403 => ProviderError::AuthenticationFailed(body),
        404 => ProviderError::ModelNotFound(model.to_string()),
        _ => ProviderError::ApiError {
            status,
            message: body,
        },
    })
}

/// Parse generated quiz text, falling back to the input label for a missing title.
pub(crate) fn quiz_from_text(text: &str, input: &QuizInput) -> Result<Quiz, ProviderError> {
    let mut quiz =
        parse_quiz_response(text).map_err(|e| ProviderError::InvalidResponse(format!("{e:#}")))?;
    if quiz.title.is_empty() {
        quiz.title = input.label();
    }
    Ok(quiz)
}

pub(crate) fn deck_from_text(text: &str) -> Result<SlideDeck, ProviderError> {
    let deck = parse_presentation_response(text)
        .map_err(|e| ProviderError::InvalidResponse(format!("{e:#}")))?;
    if let Some(problem) = deck.problems().into_iter().next() {
        return Err(ProviderError::InvalidResponse(problem));
    }
    Ok(deck)
}
