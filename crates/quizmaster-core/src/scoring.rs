//! Scoring engine with negative marking.
//!
//! Pure functions from a question set and the final answer records to an
//! immutable [`ResultSnapshot`]. No I/O happens here; the threshold cue is
//! carried in the snapshot for the presentation layer to act on.

use std::collections::HashMap;

use crate::model::{AnswerRecord, Question, QuestionId, NEGATIVE_MARKING_PER_QUESTION};
use crate::results::{Outcome, QuestionTiming, ResultSnapshot, Threshold};

/// Score an attempt with the standard negative marking.
pub fn score_answers(questions: &[Question], answers: &[AnswerRecord]) -> ResultSnapshot {
    score_with_penalty(questions, answers, NEGATIVE_MARKING_PER_QUESTION)
}

/// Score an attempt, deducting `penalty` for each attempted-but-incorrect answer.
///
/// Answers whose question cannot be found are tagged unattempted and keep
/// their recorded time, but count toward nothing else.
pub fn score_with_penalty(
    questions: &[Question],
    answers: &[AnswerRecord],
    penalty: f64,
) -> ResultSnapshot {
    let by_id: HashMap<QuestionId, &Question> = questions.iter().map(|q| (q.id, q)).collect();

    let mut correct = 0usize;
    let mut incorrect = 0usize;
    let mut unattempted = 0usize;
    let mut raw_score = 0.0f64;
    let mut negative_marks = 0.0f64;
    let mut attempted_time = 0u64;
    let mut attempted = 0usize;

    let per_question = answers
        .iter()
        .map(|answer| {
            let outcome = match (by_id.get(&answer.question_id), answer.selected_option) {
                (None, _) => {
                    tracing::warn!(
                        question_id = answer.question_id,
                        "answer record has no matching question"
                    );
                    Outcome::Unattempted
                }
                (Some(_), None) => {
                    unattempted += 1;
                    Outcome::Unattempted
                }
                (Some(question), Some(selected)) => {
                    attempted += 1;
                    attempted_time += answer.time_spent_secs;
                    if selected == question.correct_index {
                        correct += 1;
                        raw_score += 1.0;
                        Outcome::Correct
                    } else {
                        incorrect += 1;
                        raw_score -= penalty;
                        negative_marks += penalty;
                        Outcome::Incorrect
                    }
                }
            };
            QuestionTiming {
                question_id: answer.question_id,
                time_secs: answer.time_spent_secs,
                outcome,
            }
        })
        .collect();

    let total_questions = questions.len();
    let score = round_to(raw_score.max(0.0), 2);
    let percentage = if total_questions > 0 {
        round_to(100.0 * score / total_questions as f64, 1)
    } else {
        0.0
    };
    let avg_time_per_question = if attempted > 0 {
        attempted_time as f64 / attempted as f64
    } else {
        0.0
    };

    ResultSnapshot {
        correct,
        incorrect,
        unattempted,
        score,
        negative_marks_applied: round_to(negative_marks, 2),
        percentage,
        total_questions,
        avg_time_per_question,
        per_question,
        threshold: Threshold::classify(percentage, total_questions),
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    // normalise -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(correct: &[usize]) -> Vec<Question> {
        correct
            .iter()
            .enumerate()
            .map(|(i, &c)| Question {
                id: i as QuestionId + 1,
                text: format!("Q{}", i + 1),
                reference: None,
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_index: c,
                explanation: String::new(),
            })
            .collect()
    }

    fn answers(selected: &[Option<usize>], secs: u64) -> Vec<AnswerRecord> {
        selected
            .iter()
            .enumerate()
            .map(|(i, &s)| AnswerRecord {
                question_id: i as QuestionId + 1,
                selected_option: s,
                time_spent_secs: secs,
                ..AnswerRecord::new(i as QuestionId + 1)
            })
            .collect()
    }

    #[test]
    fn mixed_attempt_with_negative_marking() {
        let qs = questions(&[2, 2, 2, 2]);
        let ans = answers(&[Some(2), Some(2), Some(1), None], 10);
        let result = score_answers(&qs, &ans);

        assert_eq!(result.correct, 2);
        assert_eq!(result.incorrect, 1);
        assert_eq!(result.unattempted, 1);
        assert_eq!(result.score, 1.67);
        assert_eq!(result.negative_marks_applied, 0.33);
        assert_eq!(result.percentage, 41.8);
        assert_eq!(result.total_questions, 4);
        assert_eq!(result.avg_time_per_question, 10.0);
        assert_eq!(result.threshold, Threshold::Failure);
        assert_eq!(result.outcome_of(3), Some(Outcome::Incorrect));
        assert_eq!(result.outcome_of(4), Some(Outcome::Unattempted));
    }

    #[test]
    fn all_incorrect_clamps_to_zero() {
        let qs = questions(&[0, 0, 0]);
        let ans = answers(&[Some(1), Some(2), Some(3)], 5);
        let result = score_answers(&qs, &ans);

        assert_eq!(result.incorrect, 3);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.negative_marks_applied, 1.0);
        assert_eq!(result.percentage, 0.0);
        assert!(result.score >= 0.0);
    }

    #[test]
    fn empty_quiz_has_no_division_errors() {
        let result = score_answers(&[], &[]);
        assert_eq!(result.percentage, 0.0);
        assert_eq!(result.avg_time_per_question, 0.0);
        assert_eq!(result.total_questions, 0);
        assert_eq!(result.threshold, Threshold::None);
    }

    #[test]
    fn scoring_is_idempotent() {
        let qs = questions(&[0, 1, 2, 3, 0]);
        let ans = answers(&[Some(0), Some(0), None, Some(3), Some(1)], 7);
        let first = score_answers(&qs, &ans);
        let second = score_answers(&qs, &ans);
        assert_eq!(first, second);
        assert_eq!(first.score.to_bits(), second.score.to_bits());
        assert_eq!(first.percentage.to_bits(), second.percentage.to_bits());
    }

    #[test]
    fn counts_always_sum_to_total() {
        let qs = questions(&[0, 1, 2, 3, 0, 1]);
        let patterns: [[Option<usize>; 6]; 3] = [
            [None; 6],
            [Some(0), Some(1), Some(2), Some(3), Some(0), Some(1)],
            [Some(3), None, Some(2), None, Some(1), Some(1)],
        ];
        for pattern in &patterns {
            let result = score_answers(&qs, &answers(pattern, 1));
            assert_eq!(
                result.correct + result.incorrect + result.unattempted,
                result.total_questions
            );
            assert!(result.score >= 0.0);
        }
    }

    #[test]
    fn missing_question_keeps_time_but_not_score() {
        let qs = questions(&[0]);
        let mut ans = answers(&[Some(0)], 4);
        ans.push(AnswerRecord {
            selected_option: Some(1),
            time_spent_secs: 9,
            ..AnswerRecord::new(99)
        });
        let result = score_answers(&qs, &ans);

        assert_eq!(result.correct, 1);
        assert_eq!(result.incorrect, 0);
        assert_eq!(result.unattempted, 0);
        assert_eq!(result.score, 1.0);
        let orphan = &result.per_question[1];
        assert_eq!(orphan.question_id, 99);
        assert_eq!(orphan.time_secs, 9);
        assert_eq!(orphan.outcome, Outcome::Unattempted);
    }

    #[test]
    fn average_time_ignores_unattempted() {
        let qs = questions(&[0, 0]);
        let mut ans = answers(&[Some(0), None], 0);
        ans[0].time_spent_secs = 12;
        ans[1].time_spent_secs = 100;
        let result = score_answers(&qs, &ans);
        assert_eq!(result.avg_time_per_question, 12.0);
    }

    #[test]
    fn perfect_score_earns_success_cue() {
        let qs = questions(&[1, 1, 1]);
        let result = score_answers(&qs, &answers(&[Some(1), Some(1), Some(1)], 2));
        assert_eq!(result.percentage, 100.0);
        assert_eq!(result.threshold, Threshold::Success);
    }

    #[test]
    fn custom_penalty() {
        let qs = questions(&[0, 0]);
        let result = score_with_penalty(&qs, &answers(&[Some(0), Some(1)], 1), 0.25);
        assert_eq!(result.score, 0.75);
        assert_eq!(result.negative_marks_applied, 0.25);
        assert_eq!(result.percentage, 37.5);
    }

    #[test]
    fn rounding_helper() {
        assert_eq!(round_to(1.666_666, 2), 1.67);
        assert_eq!(round_to(41.75, 1), 41.8);
        assert_eq!(round_to(-0.001, 2), 0.0);
        assert!(round_to(-0.001, 2).is_sign_positive());
    }
}
