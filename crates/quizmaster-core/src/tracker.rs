//! Answer tracker: the per-question answer sheet mutated while a quiz is active.
//!
//! Records are kept in question order and looked up by question id. The
//! session owns the sheet exclusively; review and export only ever borrow it.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::TrackerError;
use crate::model::{AnswerRecord, Question, QuestionId, QuestionStatus, OPTION_COUNT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSheet {
    records: Vec<AnswerRecord>,
    #[serde(skip)]
    index: HashMap<QuestionId, usize>,
}

/// How many questions are in each palette status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub not_visited: usize,
    pub not_answered: usize,
    pub answered: usize,
    pub marked_for_review: usize,
    pub answered_and_marked: usize,
}

impl AnswerSheet {
    /// One default record per question, in question order.
    pub fn for_questions(questions: &[Question]) -> Self {
        let records: Vec<AnswerRecord> = questions.iter().map(|q| AnswerRecord::new(q.id)).collect();
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.question_id, i))
            .collect();
        Self { records, index }
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn get(&self, question_id: QuestionId) -> Option<&AnswerRecord> {
        self.index.get(&question_id).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record_mut(&mut self, question_id: QuestionId) -> Result<&mut AnswerRecord, TrackerError> {
        let i = *self
            .index
            .get(&question_id)
            .ok_or(TrackerError::UnknownQuestion(question_id))?;
        Ok(&mut self.records[i])
    }

    /// Select an option, replacing any earlier selection.
    pub fn select_option(&mut self, question_id: QuestionId, index: usize) -> Result<(), TrackerError> {
        if index >= OPTION_COUNT {
            return Err(TrackerError::OptionOutOfRange { question_id, index });
        }
        let record = self.record_mut(question_id)?;
        record.selected_option = Some(index);
        record.status = QuestionStatus::derive(true, record.is_marked);
        Ok(())
    }

    pub fn clear_selection(&mut self, question_id: QuestionId) -> Result<(), TrackerError> {
        let record = self.record_mut(question_id)?;
        record.selected_option = None;
        record.status = QuestionStatus::derive(false, record.is_marked);
        Ok(())
    }

    /// Accumulate time spent on a question. Never decreases the total.
    pub fn add_elapsed(&mut self, question_id: QuestionId, secs: u64) -> Result<(), TrackerError> {
        let record = self.record_mut(question_id)?;
        record.time_spent_secs = record.time_spent_secs.saturating_add(secs);
        Ok(())
    }

    pub fn set_status(&mut self, question_id: QuestionId, status: QuestionStatus) -> Result<(), TrackerError> {
        self.record_mut(question_id)?.status = status;
        Ok(())
    }

    /// Flip the review mark. Returns the new mark state.
    pub fn toggle_mark(&mut self, question_id: QuestionId) -> Result<bool, TrackerError> {
        let record = self.record_mut(question_id)?;
        record.is_marked = !record.is_marked;
        record.status = QuestionStatus::derive(record.is_attempted(), record.is_marked);
        Ok(record.is_marked)
    }

    /// First visit moves a question out of `NotVisited`.
    pub fn visit(&mut self, question_id: QuestionId) -> Result<(), TrackerError> {
        let record = self.record_mut(question_id)?;
        if record.status == QuestionStatus::NotVisited {
            record.status = QuestionStatus::NotAnswered;
        }
        Ok(())
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for record in &self.records {
            match record.status {
                QuestionStatus::NotVisited => counts.not_visited += 1,
                QuestionStatus::NotAnswered => counts.not_answered += 1,
                QuestionStatus::Answered => counts.answered += 1,
                QuestionStatus::MarkedForReview => counts.marked_for_review += 1,
                QuestionStatus::AnsweredAndMarked => counts.answered_and_marked += 1,
            }
        }
        counts
    }
}
