//! Answer review rendering.

use std::fmt;
use std::str::FromStr;

use quizmaster_core::model::Question;
use quizmaster_core::results::Outcome;
use quizmaster_core::session::ReviewView;

/// Which questions a review shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewFilter {
    #[default]
    All,
    Correct,
    Incorrect,
    Unattempted,
}

impl ReviewFilter {
    pub fn matches(self, outcome: Outcome) -> bool {
        match self {
            ReviewFilter::All => true,
            ReviewFilter::Correct => outcome == Outcome::Correct,
            ReviewFilter::Incorrect => outcome == Outcome::Incorrect,
            ReviewFilter::Unattempted => outcome == Outcome::Unattempted,
        }
    }
}

impl FromStr for ReviewFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "a" => Ok(ReviewFilter::All),
            "correct" | "c" => Ok(ReviewFilter::Correct),
            "incorrect" | "wrong" | "i" => Ok(ReviewFilter::Incorrect),
            "unattempted" | "skipped" | "u" => Ok(ReviewFilter::Unattempted),
            other => Err(format!("unknown review filter: {other}")),
        }
    }
}

impl fmt::Display for ReviewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReviewFilter::All => "all",
            ReviewFilter::Correct => "correct",
            ReviewFilter::Incorrect => "incorrect",
            ReviewFilter::Unattempted => "unattempted",
        };
        f.write_str(name)
    }
}

/// One reviewed question.
#[derive(Debug, Clone)]
pub struct ReviewEntry<'a> {
    /// 1-based position in the quiz.
    pub number: usize,
    pub question: &'a Question,
    pub selected_option: Option<usize>,
    pub time_spent_secs: u64,
    pub outcome: Outcome,
}

/// Questions of a finished attempt that pass `filter`, in quiz order.
pub fn review_entries<'a>(view: ReviewView<'a>, filter: ReviewFilter) -> Vec<ReviewEntry<'a>> {
    view.quiz
        .questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let record = view.answers.get(question.id);
            ReviewEntry {
                number: i + 1,
                question,
                selected_option: record.and_then(|r| r.selected_option),
                time_spent_secs: record.map(|r| r.time_spent_secs).unwrap_or(0),
                outcome: view
                    .result
                    .outcome_of(question.id)
                    .unwrap_or(Outcome::Unattempted),
            }
        })
        .filter(|entry| filter.matches(entry.outcome))
        .collect()
}

fn option_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// Format a review as markdown.
pub fn review_markdown(view: ReviewView<'_>, filter: ReviewFilter) -> String {
    let result = view.result;
    let mut md = String::new();

    md.push_str(&format!("## Review: {}\n\n", view.quiz.title));
    md.push_str(&format!(
        "**Summary:** {} correct, {} incorrect, {} unattempted | score {:.2}/{} ({:.1}%)\n\n",
        result.correct,
        result.incorrect,
        result.unattempted,
        result.score,
        result.total_questions,
        result.percentage
    ));
    if filter != ReviewFilter::All {
        md.push_str(&format!("_Showing {filter} questions._\n\n"));
    }

    let entries = review_entries(view, filter);
    if entries.is_empty() {
        md.push_str("_No questions match this filter._\n");
        return md;
    }

    for entry in entries {
        let q = entry.question;
        md.push_str(&format!("### Q{}. {}\n\n", entry.number, q.text));
        if let Some(reference) = &q.reference {
            md.push_str(&format!("_{reference}_\n\n"));
        }
        for (i, option) in q.options.iter().enumerate() {
            let mut line = format!("- {}. {}", option_letter(i), option);
            if i == q.correct_index {
                line.push_str(" **(correct)**");
            }
            if Some(i) == entry.selected_option {
                line.push_str(" _(your answer)_");
            }
            md.push_str(&line);
            md.push('\n');
        }
        md.push_str(&format!(
            "\n**{}** | time spent: {}s\n\n",
            entry.outcome, entry.time_spent_secs
        ));
        if !q.explanation.is_empty() {
            md.push_str(&format!("> {}\n\n", q.explanation));
        }
    }

    md
}
