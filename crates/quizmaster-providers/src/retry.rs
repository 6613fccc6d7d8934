//! Retry wrapper for transient source failures.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use quizmaster_core::error::ProviderError;
use quizmaster_core::model::Quiz;
use quizmaster_core::slides::SlideDeck;
use quizmaster_core::traits::{ModelInfo, PresentationRequest, QuestionSource, QuizRequest};

const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Wraps a source and retries transient errors with exponential backoff.
///
/// Permanent [`ProviderError`]s (bad key, unknown model, unusable response)
/// are returned at once. A rate-limit `retry-after` hint replaces the next
/// delay.
pub struct RetryingSource {
    inner: Arc<dyn QuestionSource>,
    max_retries: u32,
    retry_delay: Duration,
}

impl RetryingSource {
    pub fn new(inner: Arc<dyn QuestionSource>, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            retry_delay: retry_delay.min(MAX_RETRY_DELAY),
        }
    }

    async fn with_retries<T, F, Fut>(&self, what: &str, mut op: F) -> anyhow::Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let mut last_error = None;
        let mut retry_delay = self.retry_delay;
        for retry in 0..=self.max_retries {
            if retry > 0 {
                tracing::warn!(
                    source = self.inner.name(),
                    retry,
                    delay_ms = retry_delay.as_millis() as u64,
                    "retrying {what}"
                );
                tokio::time::sleep(retry_delay).await;
                retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
            }
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if let Some(provider_err) = e.downcast_ref::<ProviderError>() {
                        if provider_err.is_permanent() {
                            return Err(e);
                        }
                        if let Some(ms) = provider_err.retry_after_ms() {
                            retry_delay = Duration::from_millis(ms).min(MAX_RETRY_DELAY);
                        }
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
    }
}

#[async_trait]
impl QuestionSource for RetryingSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate_quiz(&self, request: &QuizRequest) -> anyhow::Result<Quiz> {
        self.with_retries("quiz generation", || self.inner.generate_quiz(request))
            .await
    }

    async fn generate_presentation(
        &self,
        request: &PresentationRequest,
    ) -> anyhow::Result<SlideDeck> {
        self.with_retries("presentation generation", || {
            self.inner.generate_presentation(request)
        })
        .await
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        self.inner.available_models()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{sample_quiz, MockSource};
    use quizmaster_core::model::Language;
    use quizmaster_core::traits::QuizInput;

    fn request() -> QuizRequest {
        QuizRequest {
            model: "mock-model".into(),
            input: QuizInput::Topic("anything".into()),
            question_count: 2,
            language: Language::English,
            temperature: 0.0,
        }
    }

    fn wrap(mock: Arc<MockSource>, retries: u32) -> RetryingSource {
        RetryingSource::new(mock, retries, Duration::from_millis(100))
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_from_transient_errors() {
        let mock = Arc::new(MockSource::with_quiz(sample_quiz()).fail_first(vec![
            ProviderError::Timeout(120),
            ProviderError::ApiError {
                status: 503,
                message: "overloaded".into(),
            },
        ]));
        let quiz = wrap(mock.clone(), 3).generate_quiz(&request()).await.unwrap();
        assert_eq!(quiz.title, sample_quiz().title);
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_errors_are_not_retried() {
        let mock = Arc::new(
            MockSource::with_quiz(sample_quiz())
                .fail_first(vec![ProviderError::AuthenticationFailed("bad key".into())]),
        );
        let err = wrap(mock.clone(), 3).generate_quiz(&request()).await.unwrap_err();
        assert!(err.to_string().contains("authentication failed"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let mock = Arc::new(MockSource::unavailable());
        let err = wrap(mock.clone(), 2).generate_quiz(&request()).await.unwrap_err();
        assert!(err.to_string().contains("503"));
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn honours_retry_after_hint() {
        let mock = Arc::new(
            MockSource::with_quiz(sample_quiz()).fail_first(vec![ProviderError::RateLimited {
                retry_after_ms: 5_000,
            }]),
        );
        let start = tokio::time::Instant::now();
        wrap(mock, 1).generate_quiz(&request()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(5_000));
    }

    #[tokio::test(start_paused = true)]
    async fn configured_delay_is_capped() {
        let mock = Arc::new(
            MockSource::with_quiz(sample_quiz()).fail_first(vec![ProviderError::Timeout(120)]),
        );
        let source = RetryingSource::new(mock.clone(), 1, Duration::from_secs(600));
        let start = tokio::time::Instant::now();
        source.generate_quiz(&request()).await.unwrap();
        assert_eq!(mock.call_count(), 2);
        assert!(start.elapsed() >= MAX_RETRY_DELAY);
        assert!(start.elapsed() < Duration::from_secs(61));
    }
}
