//! Mock source for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizmaster_core::error::ProviderError;
use quizmaster_core::model::{Question, Quiz};
use quizmaster_core::slides::{Slide, SlideDeck, SlideKind};
use quizmaster_core::traits::{ModelInfo, PresentationRequest, QuestionSource, QuizRequest};

/// A mock question source for exercising sessions without real API calls.
///
/// Returns a fixed quiz, optionally after a scripted run of failures.
pub struct MockSource {
    quiz: Option<Quiz>,
    deck: Option<SlideDeck>,
    failures: Mutex<VecDeque<ProviderError>>,
    call_count: AtomicU32,
    last_request: Mutex<Option<QuizRequest>>,
}

impl MockSource {
    /// A mock that always returns `quiz`.
    pub fn with_quiz(quiz: Quiz) -> Self {
        Self {
            quiz: Some(quiz),
            deck: None,
            failures: Mutex::new(VecDeque::new()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A mock whose every call fails with HTTP 503.
    pub fn unavailable() -> Self {
        Self {
            quiz: None,
            ..Self::with_quiz(sample_quiz())
        }
    }

    /// Fail the first calls with `errors`, in order, before succeeding.
    pub fn fail_first(self, errors: Vec<ProviderError>) -> Self {
        *self.failures.lock().unwrap() = errors.into();
        self
    }

    pub fn with_deck(mut self, deck: SlideDeck) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last quiz request made to this source.
    pub fn last_request(&self) -> Option<QuizRequest> {
        self.last_request.lock().unwrap().clone()
    }

    fn next_failure(&self) -> Option<ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.failures.lock().unwrap().pop_front()
    }
}

fn unavailable_error() -> ProviderError {
    ProviderError::ApiError {
        status: 503,
        message: "mock source unavailable".into(),
    }
}

#[async_trait]
impl QuestionSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_quiz(&self, request: &QuizRequest) -> anyhow::Result<Quiz> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        if let Some(err) = self.next_failure() {
            return Err(err.into());
        }
        self.quiz.clone().ok_or_else(|| unavailable_error().into())
    }

    async fn generate_presentation(
        &self,
        _request: &PresentationRequest,
    ) -> anyhow::Result<SlideDeck> {
        if let Some(err) = self.next_failure() {
            return Err(err.into());
        }
        self.deck.clone().ok_or_else(|| unavailable_error().into())
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
        }]
    }
}

/// A small valid quiz: four questions, correct options 2, 2, 2, 2.
pub fn sample_quiz() -> Quiz {
    let questions = [
        ("Which river is known as the Dakshin Ganga?", "Godavari"),
        ("Which planet is known as the Red Planet?", "Mars"),
        ("Who wrote the Indian national anthem?", "Rabindranath Tagore"),
        ("What is the chemical symbol for gold?", "Au"),
    ];
    Quiz {
        title: "General Knowledge".into(),
        questions: questions
            .iter()
            .enumerate()
            .map(|(i, (text, answer))| Question {
                id: i as u32 + 1,
                text: text.to_string(),
                reference: None,
                options: vec![
                    "Option A".into(),
                    "Option B".into(),
                    answer.to_string(),
                    "Option D".into(),
                ],
                correct_index: 2,
                explanation: format!("The answer is {answer}."),
            })
            .collect(),
    }
}

/// A three-slide deck with one question slide.
pub fn sample_deck() -> SlideDeck {
    let slide = |number, title: &str, kind| Slide {
        number,
        title: title.into(),
        kind,
        content: vec![],
        options: None,
        correct_option_index: None,
        explanation: None,
        notes: None,
    };
    let mut question = slide(2, "Quick check", SlideKind::QuestionSlide);
    question.content = vec!["Which planet is known as the Red Planet?".into()];
    question.options = Some(vec!["Venus".into(), "Mars".into(), "Earth".into(), "Moon".into()]);
    question.correct_option_index = Some(1);
    question.explanation = Some("Iron oxide gives Mars its colour.".into());
    SlideDeck {
        title: "The Solar System".into(),
        slides: vec![
            slide(1, "The Solar System", SlideKind::TitleSlide),
            question,
            slide(3, "Thank you", SlideKind::ThankYouSlide),
        ],
    }
}
