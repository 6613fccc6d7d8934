//! The `quizmaster validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmaster_core::model::time_allowance_secs;
use quizmaster_core::parser::{load_quiz_directory, parse_quiz_file, validate_quiz};

use crate::console::format_clock;

pub fn execute(quiz_path: PathBuf) -> Result<()> {
    let quizzes = if quiz_path.is_dir() {
        load_quiz_directory(&quiz_path)?
    } else {
        vec![parse_quiz_file(&quiz_path)?]
    };

    let mut total_issues = 0;

    for quiz in &quizzes {
        println!(
            "Quiz: {} ({} questions, {})",
            quiz.title,
            quiz.len(),
            format_clock(time_allowance_secs(quiz.len()))
        );

        let issues = validate_quiz(quiz);
        for issue in &issues {
            let prefix = issue
                .question_id
                .map(|id| format!("  [Q{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", issue.message);
        }
        total_issues += issues.len();
    }

    if total_issues == 0 {
        println!("All quizzes valid.");
    } else {
        println!("\n{total_issues} problem(s) found.");
    }

    Ok(())
}
