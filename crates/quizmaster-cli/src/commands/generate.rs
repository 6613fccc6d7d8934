//! The `quizmaster generate` command.

use std::sync::Arc;

use anyhow::{Context, Result};

use quizmaster_core::parser::write_quiz_file;
use quizmaster_core::session::Phase;
use quizmaster_report::{export_file_name, write_quiz_html};

use super::{read_input, Setup};
use crate::console::ConsoleObserver;
use crate::{InputArgs, SourceArgs};

pub async fn execute(input: InputArgs, questions: Option<u32>, source: SourceArgs) -> Result<()> {
    let setup = Setup::load(&source, questions)?;
    let input = read_input(&input)?.context("a topic or text file is required")?;

    let mut session = setup.session(Arc::new(ConsoleObserver));
    session.submit_input(input).await?;
    if session.phase() != Phase::Ready {
        let reason = session
            .error()
            .map(ToString::to_string)
            .unwrap_or_else(|| "quiz generation failed".to_string());
        anyhow::bail!(reason);
    }

    let bundle = session.export_bundle().context("no quiz to export")?;
    let html_path = setup.output_dir.join(export_file_name(&bundle.quiz.title));
    write_quiz_html(&bundle, &setup.config.branding, &html_path)?;
    session.mark_auto_exported()?;

    let toml_path = html_path.with_extension("toml");
    write_quiz_file(&bundle.quiz, &toml_path)?;

    println!(
        "Generated \"{}\" ({} questions)",
        bundle.quiz.title,
        bundle.quiz.len()
    );
    println!("  HTML: {}", html_path.display());
    println!("  Quiz file: {}", toml_path.display());
    println!(
        "\nTake it in the terminal with: quizmaster take --quiz-file {}",
        toml_path.display()
    );

    Ok(())
}
