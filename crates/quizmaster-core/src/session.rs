//! Quiz session state machine.
//!
//! A [`QuizSession`] owns the current phase, the generated quiz, the answer
//! sheet of the attempt in progress, and the result of the last completed
//! attempt. Each phase is a variant of a private `State` enum carrying exactly
//! the data that phase may use, so e.g. answers cannot be touched outside
//! `Active` and a result cannot exist without the quiz it was scored against.
//!
//! ```text
//! Input ──submit──▶ Loading ──ok──▶ Ready ──▶ Instructions ──start──▶ Active
//!   ▲                  │ err          │  ▲         │                    │ submit / time up
//!   └──────────────────┘              │  └─back────┘                    ▼
//!   ▲◀──────────────── start new ─────┘          Review ◀──review──▶ Completed
//!   └◀──────────────────────── start new ──────────┴──────────────────┘ │ reattempt ─▶ Active
//! ```
//!
//! Errors never escape the session: generation and consistency failures are
//! stored as a [`QuizError`] and the session returns to `Input`.

use std::fmt;
use std::sync::Arc;

use crate::error::{QuizError, SessionError, TrackerError};
use crate::model::{
    time_allowance_secs, Language, QuestionId, QuestionStatus, Quiz, DEFAULT_QUESTION_COUNT,
    NEGATIVE_MARKING_PER_QUESTION,
};
use crate::parser::validate_quiz;
use crate::results::{ResultSnapshot, Threshold};
use crate::scoring::score_with_penalty;
use crate::tracker::AnswerSheet;
use crate::traits::{QuestionSource, QuizInput, QuizRequest};

/// The single current stage of the quiz lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Input,
    Loading,
    Ready,
    Instructions,
    Active,
    Completed,
    Review,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Input => "input",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Instructions => "instructions",
            Phase::Active => "active",
            Phase::Completed => "completed",
            Phase::Review => "review",
        };
        f.write_str(name)
    }
}

/// Settings that shape generation requests and scoring.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Model identifier passed to the question source.
    pub model: String,
    pub language: Language,
    pub question_count: u32,
    pub temperature: f64,
    /// Marks deducted per incorrect answer.
    pub negative_marking: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            language: Language::default(),
            question_count: DEFAULT_QUESTION_COUNT,
            temperature: 0.7,
            negative_marking: NEGATIVE_MARKING_PER_QUESTION,
        }
    }
}

/// Receives fire-and-forget notifications from a session.
///
/// Implementations must not block; nothing they do can affect scoring or state.
pub trait SessionObserver: Send + Sync {
    fn on_phase_change(&self, from: Phase, to: Phase);
    fn on_generation_error(&self, error: &QuizError);
    /// Called once per completed attempt whose score crossed a cue threshold.
    fn on_threshold(&self, threshold: Threshold, result: &ResultSnapshot);
}

/// No-op session observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_phase_change(&self, _: Phase, _: Phase) {}
    fn on_generation_error(&self, _: &QuizError) {}
    fn on_threshold(&self, _: Threshold, _: &ResultSnapshot) {}
}

/// What the export collaborator needs to render a standalone quiz document.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub quiz: Arc<Quiz>,
    pub total_time_secs: u64,
    pub negative_marking: f64,
    pub language: Language,
}

/// Read-only view handed to the review collaborator.
#[derive(Debug, Clone, Copy)]
pub struct ReviewView<'a> {
    pub quiz: &'a Quiz,
    pub answers: &'a AnswerSheet,
    pub result: &'a ResultSnapshot,
}

struct ActiveAttempt {
    quiz: Arc<Quiz>,
    sheet: AnswerSheet,
    remaining_secs: u64,
}

struct FinishedAttempt {
    quiz: Arc<Quiz>,
    sheet: AnswerSheet,
    result: Arc<ResultSnapshot>,
}

enum State {
    Input,
    Loading,
    Ready(Arc<Quiz>),
    Instructions(Arc<Quiz>),
    Active(ActiveAttempt),
    Completed(FinishedAttempt),
    Review(FinishedAttempt),
}

impl State {
    fn phase(&self) -> Phase {
        match self {
            State::Input => Phase::Input,
            State::Loading => Phase::Loading,
            State::Ready(_) => Phase::Ready,
            State::Instructions(_) => Phase::Instructions,
            State::Active(_) => Phase::Active,
            State::Completed(_) => Phase::Completed,
            State::Review(_) => Phase::Review,
        }
    }

    fn quiz(&self) -> Option<&Arc<Quiz>> {
        match self {
            State::Input | State::Loading => None,
            State::Ready(quiz) | State::Instructions(quiz) => Some(quiz),
            State::Active(attempt) => Some(&attempt.quiz),
            State::Completed(done) | State::Review(done) => Some(&done.quiz),
        }
    }
}

/// A single-user quiz session.
pub struct QuizSession {
    source: Option<Arc<dyn QuestionSource>>,
    configuration_error: Option<QuizError>,
    settings: SessionSettings,
    observer: Arc<dyn SessionObserver>,
    state: State,
    error: Option<QuizError>,
    topic: Option<QuizInput>,
    auto_exported: bool,
}

impl QuizSession {
    pub fn new(source: Arc<dyn QuestionSource>, settings: SessionSettings) -> Self {
        Self {
            source: Some(source),
            configuration_error: None,
            settings,
            observer: Arc::new(NoopObserver),
            state: State::Input,
            error: None,
            topic: None,
            auto_exported: false,
        }
    }

    /// A session with no usable question source. `error()` reports `reason`
    /// until the process is restarted with a working configuration.
    pub fn unconfigured(reason: QuizError, settings: SessionSettings) -> Self {
        tracing::warn!("session has no question source: {reason}");
        Self {
            source: None,
            configuration_error: Some(reason),
            settings,
            observer: Arc::new(NoopObserver),
            state: State::Input,
            error: None,
            topic: None,
            auto_exported: false,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// The message to show the user, if any. A configuration problem always wins.
    pub fn error(&self) -> Option<&QuizError> {
        self.configuration_error.as_ref().or(self.error.as_ref())
    }

    /// The input that produced the current quiz.
    pub fn topic(&self) -> Option<&QuizInput> {
        self.topic.as_ref()
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.state.quiz().map(|q| q.as_ref())
    }

    /// A shared handle to the current quiz, for callers that keep it across mutations.
    pub fn shared_quiz(&self) -> Option<Arc<Quiz>> {
        self.state.quiz().cloned()
    }

    /// The answer sheet of the current or last attempt.
    pub fn answers(&self) -> Option<&AnswerSheet> {
        match &self.state {
            State::Active(attempt) => Some(&attempt.sheet),
            State::Completed(done) | State::Review(done) => Some(&done.sheet),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&ResultSnapshot> {
        match &self.state {
            State::Completed(done) | State::Review(done) => Some(&done.result),
            _ => None,
        }
    }

    /// Seconds left on the countdown while a quiz is active.
    pub fn remaining_secs(&self) -> Option<u64> {
        match &self.state {
            State::Active(attempt) => Some(attempt.remaining_secs),
            _ => None,
        }
    }

    /// Time allowed for the current quiz.
    pub fn time_allowance_secs(&self) -> Option<u64> {
        self.state.quiz().map(|q| time_allowance_secs(q.len()))
    }

    pub fn is_auto_exported(&self) -> bool {
        self.auto_exported
    }

    /// Everything needed to export the current quiz as a standalone document.
    pub fn export_bundle(&self) -> Option<ExportBundle> {
        self.state.quiz().map(|quiz| ExportBundle {
            quiz: Arc::clone(quiz),
            total_time_secs: time_allowance_secs(quiz.len()),
            negative_marking: self.settings.negative_marking,
            language: self.settings.language,
        })
    }

    /// Questions, answers and result of a finished attempt.
    pub fn review_view(&self) -> Option<ReviewView<'_>> {
        match &self.state {
            State::Completed(done) | State::Review(done) => Some(ReviewView {
                quiz: &done.quiz,
                answers: &done.sheet,
                result: &done.result,
            }),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn require(&self, phases: &[Phase], action: &'static str) -> Result<(), SessionError> {
        if phases.contains(&self.phase()) {
            Ok(())
        } else {
            Err(self.illegal(action))
        }
    }

    fn illegal(&self, action: &'static str) -> SessionError {
        let from = self.phase();
        tracing::warn!(%from, action, "illegal session transition");
        SessionError::IllegalTransition { from, action }
    }

    fn transition(&mut self, next: State) -> Phase {
        self.transition_from(self.phase(), next)
    }

    /// Like `transition`, for states already moved out of `self.state`.
    fn transition_from(&mut self, from: Phase, next: State) -> Phase {
        let to = next.phase();
        self.state = next;
        tracing::info!(%from, %to, "session phase change");
        self.observer.on_phase_change(from, to);
        to
    }

    fn fail_to_input(&mut self, from: Phase, error: QuizError) -> Phase {
        tracing::error!(kind = error.kind(), "{error}");
        self.observer.on_generation_error(&error);
        self.error = Some(error);
        self.transition_from(from, State::Input)
    }

    /// Ask the question source for a quiz. The session stays in `Loading`
    /// until the source resolves; holding `&mut self` across the await keeps
    /// every other transition out.
    ///
    /// A session still in `Loading` when called again had its previous
    /// request dropped before it resolved; it is treated as back at `Input`.
    pub async fn submit_input(&mut self, input: QuizInput) -> Result<Phase, SessionError> {
        self.require(&[Phase::Input, Phase::Loading], "generate a quiz")?;
        self.recover_abandoned_load();

        if let Some(error) = &self.configuration_error {
            self.observer.on_generation_error(error);
            return Ok(Phase::Input);
        }
        let Some(source) = self.source.clone() else {
            return Ok(Phase::Input);
        };
        if input.is_blank() {
            self.error = Some(QuizError::Generation(
                "Please enter a topic or paste some text first.".into(),
            ));
            return Ok(Phase::Input);
        }

        self.error = None;
        self.transition(State::Loading);

        let request = QuizRequest {
            model: self.settings.model.clone(),
            input: input.clone(),
            question_count: self.settings.question_count,
            language: self.settings.language,
            temperature: self.settings.temperature,
        };
        tracing::info!(
            source = source.name(),
            input = %input.label(),
            count = request.question_count,
            "generating quiz"
        );

        let quiz = match source.generate_quiz(&request).await {
            Ok(quiz) => quiz,
            Err(e) => {
                return Ok(self.fail_to_input(Phase::Loading, QuizError::Generation(format!(
                    "Failed to generate questions: {e:#}"
                ))));
            }
        };

        if let Some(issue) = validate_quiz(&quiz).first() {
            return Ok(self.fail_to_input(Phase::Loading, QuizError::Generation(format!(
                "The generated quiz was invalid ({issue}). Please try again."
            ))));
        }

        tracing::info!(title = %quiz.title, questions = quiz.len(), "quiz ready");
        self.topic = Some(input);
        Ok(self.transition(State::Ready(Arc::new(quiz))))
    }

    /// Record that the front-end exported the quiz on arrival.
    pub fn mark_auto_exported(&mut self) -> Result<(), SessionError> {
        self.require(&[Phase::Ready], "mark the quiz exported")?;
        self.auto_exported = true;
        Ok(())
    }

    pub fn proceed_to_instructions(&mut self) -> Result<Phase, SessionError> {
        match self.take_state() {
            State::Ready(quiz) => Ok(self.transition_from(Phase::Ready, State::Instructions(quiz))),
            other => Err(self.restore(other, "show instructions")),
        }
    }

    pub fn back_to_ready(&mut self) -> Result<Phase, SessionError> {
        match self.take_state() {
            State::Instructions(quiz) => Ok(self.transition_from(Phase::Instructions, State::Ready(quiz))),
            other => Err(self.restore(other, "go back")),
        }
    }

    /// Accept the instructions and begin the attempt with a fresh answer sheet.
    pub fn start_quiz(&mut self) -> Result<Phase, SessionError> {
        match self.take_state() {
            State::Instructions(quiz) => Ok(self.begin_attempt(Phase::Instructions, quiz)),
            other => Err(self.restore(other, "start the quiz")),
        }
    }

    fn begin_attempt(&mut self, from: Phase, quiz: Arc<Quiz>) -> Phase {
        let attempt = ActiveAttempt {
            sheet: AnswerSheet::for_questions(&quiz.questions),
            remaining_secs: time_allowance_secs(quiz.len()),
            quiz,
        };
        self.transition_from(from, State::Active(attempt))
    }

    /// Finish the attempt and score it. Scoring runs exactly once per attempt.
    pub fn submit_answers(&mut self) -> Result<Arc<ResultSnapshot>, SessionError> {
        let attempt = match self.take_state() {
            State::Active(attempt) => attempt,
            other => return Err(self.restore(other, "submit answers")),
        };

        let result = Arc::new(score_with_penalty(
            &attempt.quiz.questions,
            attempt.sheet.records(),
            self.settings.negative_marking,
        ));
        tracing::info!(
            correct = result.correct,
            incorrect = result.incorrect,
            unattempted = result.unattempted,
            score = result.score,
            percentage = result.percentage,
            "quiz submitted"
        );

        self.transition_from(Phase::Active, State::Completed(FinishedAttempt {
            quiz: attempt.quiz,
            sheet: attempt.sheet,
            result: Arc::clone(&result),
        }));

        if result.threshold != Threshold::None {
            self.observer.on_threshold(result.threshold, &result);
        }
        Ok(result)
    }

    /// Enter review. Without a result and a non-empty question set the session
    /// falls back to `Input` with an explanatory error.
    pub fn review(&mut self) -> Result<Phase, SessionError> {
        let done = match self.take_state() {
            State::Completed(done) => done,
            other => return Err(self.restore(other, "review answers")),
        };
        if done.quiz.is_empty() {
            self.clear_quiz_state();
            return Ok(self.fail_to_input(Phase::Completed, QuizError::DataConsistency(
                "Cannot review answers. Quiz data not found. Please start a new quiz.".into(),
            )));
        }
        Ok(self.transition_from(Phase::Completed, State::Review(done)))
    }

    pub fn exit_review(&mut self) -> Result<Phase, SessionError> {
        match self.take_state() {
            State::Review(done) => Ok(self.transition_from(Phase::Review, State::Completed(done))),
            other => Err(self.restore(other, "exit review")),
        }
    }

    /// Retake the same questions with a fresh answer sheet. No new generation.
    pub fn reattempt(&mut self) -> Result<Phase, SessionError> {
        match self.take_state() {
            State::Completed(done) => Ok(self.begin_attempt(Phase::Completed, done.quiz)),
            other => Err(self.restore(other, "reattempt the quiz")),
        }
    }

    /// Discard all quiz state and return to `Input`.
    pub fn start_new(&mut self) -> Result<Phase, SessionError> {
        self.require(
            &[
                Phase::Input,
                Phase::Loading,
                Phase::Ready,
                Phase::Completed,
                Phase::Review,
            ],
            "start a new quiz",
        )?;
        self.clear_quiz_state();
        self.error = None;
        Ok(self.transition(State::Input))
    }

    fn recover_abandoned_load(&mut self) {
        if matches!(self.state, State::Loading) {
            tracing::warn!("previous quiz generation was abandoned");
            self.transition(State::Input);
        }
    }

    fn take_state(&mut self) -> State {
        std::mem::replace(&mut self.state, State::Input)
    }

    /// Put back a state taken for a transition it does not allow.
    fn restore(&mut self, state: State, action: &'static str) -> SessionError {
        self.state = state;
        self.illegal(action)
    }

    fn clear_quiz_state(&mut self) {
        self.topic = None;
        self.auto_exported = false;
    }

    // -----------------------------------------------------------------------
    // Answer tracking (only while Active)
    // -----------------------------------------------------------------------

    fn with_sheet<T>(
        &mut self,
        action: &'static str,
        f: impl FnOnce(&mut AnswerSheet) -> Result<T, TrackerError>,
    ) -> Option<T> {
        let State::Active(attempt) = &mut self.state else {
            tracing::debug!(phase = %self.state.phase(), action, "ignored outside active quiz");
            return None;
        };
        match f(&mut attempt.sheet) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(action, "ignored: {e}");
                None
            }
        }
    }

    /// Returns `false` if the selection was ignored.
    pub fn select_option(&mut self, question_id: QuestionId, index: usize) -> bool {
        self.with_sheet("select option", |s| s.select_option(question_id, index))
            .is_some()
    }

    pub fn clear_selection(&mut self, question_id: QuestionId) -> bool {
        self.with_sheet("clear selection", |s| s.clear_selection(question_id))
            .is_some()
    }

    pub fn add_elapsed(&mut self, question_id: QuestionId, secs: u64) -> bool {
        self.with_sheet("add elapsed time", |s| s.add_elapsed(question_id, secs))
            .is_some()
    }

    pub fn set_status(&mut self, question_id: QuestionId, status: QuestionStatus) -> bool {
        self.with_sheet("set status", |s| s.set_status(question_id, status))
            .is_some()
    }

    /// Returns the new mark state, or `None` if ignored.
    pub fn toggle_mark(&mut self, question_id: QuestionId) -> Option<bool> {
        self.with_sheet("toggle mark", |s| s.toggle_mark(question_id))
    }

    pub fn visit(&mut self, question_id: QuestionId) -> bool {
        self.with_sheet("visit", |s| s.visit(question_id)).is_some()
    }

    /// Apply one timer tick: charge `secs` to the question on screen and run
    /// the countdown down. When time runs out the attempt is submitted and
    /// its result returned.
    pub fn tick(&mut self, current: Option<QuestionId>, secs: u64) -> Option<Arc<ResultSnapshot>> {
        let State::Active(attempt) = &mut self.state else {
            return None;
        };
        if let Some(id) = current {
            if let Err(e) = attempt.sheet.add_elapsed(id, secs) {
                tracing::debug!("tick ignored for question: {e}");
            }
        }
        attempt.remaining_secs = attempt.remaining_secs.saturating_sub(secs);
        if attempt.remaining_secs > 0 {
            return None;
        }
        tracing::info!("time is up, submitting");
        self.submit_answers().ok()
    }
}
