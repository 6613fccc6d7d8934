//! Terminal rendering for sessions: the observer and the result tables.

use comfy_table::{Cell, Table};

use quizmaster_core::error::QuizError;
use quizmaster_core::results::{ResultSnapshot, Threshold};
use quizmaster_core::session::{Phase, SessionObserver};
use quizmaster_core::tracker::AnswerSheet;

/// Console session observer. Cues go to stderr so piped stdout stays clean.
pub struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_phase_change(&self, from: Phase, to: Phase) {
        if to == Phase::Loading {
            eprintln!("  Generating questions...");
        }
        tracing::debug!(%from, %to, "console observed phase change");
    }

    fn on_generation_error(&self, error: &QuizError) {
        eprintln!("  ERROR ({}): {error}", error.kind());
    }

    fn on_threshold(&self, threshold: Threshold, result: &ResultSnapshot) {
        match threshold {
            Threshold::Success => {
                eprintln!("\x07  Excellent! {:.1}% puts you above the bar.", result.percentage)
            }
            Threshold::Failure => {
                eprintln!("\x07  {:.1}%. Keep practising, you'll get there.", result.percentage)
            }
            Threshold::None => {}
        }
    }
}

/// `mm:ss`, or `h:mm:ss` past an hour.
pub fn format_clock(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

pub fn print_result(result: &ResultSnapshot) {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Correct"), Cell::new(result.correct)]);
    table.add_row(vec![Cell::new("Incorrect"), Cell::new(result.incorrect)]);
    table.add_row(vec![Cell::new("Unattempted"), Cell::new(result.unattempted)]);
    table.add_row(vec![
        Cell::new("Negative marks"),
        Cell::new(format!("-{:.2}", result.negative_marks_applied)),
    ]);
    table.add_row(vec![
        Cell::new("Score"),
        Cell::new(format!("{:.2} / {}", result.score, result.total_questions)),
    ]);
    table.add_row(vec![
        Cell::new("Percentage"),
        Cell::new(format!("{:.1}%", result.percentage)),
    ]);
    table.add_row(vec![
        Cell::new("Avg time / attempted"),
        Cell::new(format!("{:.1}s", result.avg_time_per_question)),
    ]);

    println!("\nResults\n{table}");
}

/// Question palette: one row per question with its status and time.
pub fn print_palette(sheet: &AnswerSheet, current: usize) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Status", "Time"]);
    for (i, record) in sheet.records().iter().enumerate() {
        let number = if i == current {
            format!("> {}", i + 1)
        } else {
            (i + 1).to_string()
        };
        table.add_row(vec![
            Cell::new(number),
            Cell::new(record.status),
            Cell::new(format!("{}s", record.time_spent_secs)),
        ]);
    }

    let counts = sheet.status_counts();
    println!("{table}");
    println!(
        "answered {} | answered & marked {} | marked {} | not answered {} | not visited {}",
        counts.answered,
        counts.answered_and_marked,
        counts.marked_for_review,
        counts.not_answered,
        counts.not_visited
    );
}
