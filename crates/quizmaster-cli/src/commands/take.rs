//! The `quizmaster take` command.
//!
//! Drives a [`QuizSession`] from line-oriented stdin. Lines are read on a
//! dedicated thread and forwarded over a channel so the active-quiz loop can
//! race them against the one-second countdown tick.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use quizmaster_core::error::QuizError;
use quizmaster_core::instructions::InstructionSheet;
use quizmaster_core::model::{Quiz, OPTION_COUNT};
use quizmaster_core::report::AttemptReport;
use quizmaster_core::session::{Phase, QuizSession};
use quizmaster_core::traits::QuizInput;
use quizmaster_providers::file::FileSource;
use quizmaster_report::{export_file_name, review_markdown, write_quiz_html, ReviewFilter};

use super::{read_input, Setup};
use crate::console::{format_clock, print_palette, print_result, ConsoleObserver};
use crate::{InputArgs, SourceArgs};

const TICK: Duration = Duration::from_secs(1);

/// Remaining-time marks at which the countdown is announced.
const TIME_WARNINGS_SECS: [u64; 2] = [300, 60];

const ACTIVE_HELP: &str = "\
  1-4          select an option
  c            clear the selection
  m            mark / unmark for review
  n (or Enter) next question
  p            previous question
  g <number>   go to a question
  l            question palette
  s            submit answers";

/// A command typed while a quiz is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveCommand {
    Select(usize),
    Clear,
    Mark,
    Next,
    Prev,
    /// 1-based question number.
    Goto(usize),
    Palette,
    Submit,
    Help,
}

fn option_index(word: &str) -> Option<usize> {
    let index = word.parse::<usize>().ok()?.checked_sub(1)?;
    (index < OPTION_COUNT).then_some(index)
}

fn parse_active_command(line: &str) -> Option<ActiveCommand> {
    let line = line.trim().to_lowercase();
    let mut words = line.split_whitespace();
    let word = words.next().unwrap_or("");
    let arg = words.next();
    if words.next().is_some() {
        return None;
    }

    let command = match (word, arg) {
        ("" | "n" | "next", None) => ActiveCommand::Next,
        ("p" | "prev", None) => ActiveCommand::Prev,
        ("c" | "clear", None) => ActiveCommand::Clear,
        ("m" | "mark", None) => ActiveCommand::Mark,
        ("l" | "palette", None) => ActiveCommand::Palette,
        ("s" | "submit", None) => ActiveCommand::Submit,
        ("h" | "?" | "help", None) => ActiveCommand::Help,
        ("g" | "goto", Some(n)) => ActiveCommand::Goto(n.parse().ok().filter(|&n| n >= 1)?),
        (word, None) => ActiveCommand::Select(option_index(word)?),
        _ => return None,
    };
    Some(command)
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn prompt(lines: &mut mpsc::Receiver<String>, text: &str) -> Option<String> {
    print!("{text}");
    std::io::stdout().flush().ok();
    let line = lines.recv().await?;
    Some(line.trim().to_string())
}

pub async fn execute(
    quiz_file: Option<PathBuf>,
    input: InputArgs,
    questions: Option<u32>,
    source: SourceArgs,
    no_export: bool,
) -> Result<()> {
    let setup = Setup::load(&source, questions)?;
    let observer = Arc::new(ConsoleObserver);

    let (mut session, first_input) = match quiz_file {
        Some(path) => {
            let label = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "quiz".to_string());
            let session = QuizSession::new(Arc::new(FileSource::new(path)), setup.settings.clone())
                .with_observer(observer);
            (session, QuizInput::Topic(label))
        }
        None => {
            let input = read_input(&input)?.context("a topic, text file or quiz file is required")?;
            (setup.session(observer), input)
        }
    };

    let mut lines = spawn_stdin_reader();
    let mut pending = Some(first_input);
    let mut last_input: Option<QuizInput> = None;
    let mut shown: Option<Phase> = None;

    loop {
        let phase = session.phase();
        let entered = shown != Some(phase);
        shown = Some(phase);

        match phase {
            Phase::Input => {
                if let Some(input) = pending.take() {
                    let blank = input.is_blank();
                    last_input = Some(input.clone());
                    session.submit_input(input).await?;
                    if blank {
                        if let Some(error) = session.error() {
                            eprintln!("  {error}");
                        }
                    }
                    shown = None;
                    continue;
                }
                if let Some(error @ QuizError::Configuration(_)) = session.error() {
                    anyhow::bail!("{error}");
                }
                let Some(line) = prompt(&mut lines, "Enter a topic, 'retry' or 'quit': ").await
                else {
                    break;
                };
                match line.as_str() {
                    "q" | "quit" => break,
                    "r" | "retry" => pending = last_input.clone(),
                    topic => pending = Some(QuizInput::Topic(topic.to_string())),
                }
            }
            Phase::Loading => anyhow::bail!("quiz generation did not finish"),
            Phase::Ready => {
                if entered {
                    if !no_export && !session.is_auto_exported() {
                        export_quiz(&session, &setup);
                        session.mark_auto_exported()?;
                    }
                    print_ready(&session);
                }
                let Some(line) = prompt(&mut lines, "[s]tart, [e]xport, [n]ew quiz, [q]uit: ").await
                else {
                    break;
                };
                match line.as_str() {
                    "s" | "start" => {
                        session.proceed_to_instructions()?;
                    }
                    "e" | "export" => export_quiz(&session, &setup),
                    "n" | "new" => {
                        session.start_new()?;
                    }
                    "q" | "quit" => break,
                    other => println!("Unknown command: {other}"),
                }
            }
            Phase::Instructions => {
                if entered {
                    print_instructions(&session)?;
                }
                let Some(line) = prompt(&mut lines, "Type 'agree' to begin or 'back': ").await
                else {
                    break;
                };
                match line.to_lowercase().as_str() {
                    "agree" | "y" | "yes" => {
                        session.start_quiz()?;
                    }
                    "b" | "back" => {
                        session.back_to_ready()?;
                    }
                    "q" | "quit" => break,
                    _ => println!("You must agree to the instructions to start."),
                }
            }
            Phase::Active => run_active(&mut session, &mut lines).await?,
            Phase::Completed => {
                if entered {
                    if let Some(result) = session.result() {
                        print_result(result);
                    }
                }
                let Some(line) = prompt(
                    &mut lines,
                    "[r]eview, retry ([a]), [s]ave report, [n]ew quiz, [q]uit: ",
                )
                .await
                else {
                    break;
                };
                match line.as_str() {
                    "r" | "review" => {
                        session.review()?;
                    }
                    "a" | "retry" | "reattempt" => {
                        session.reattempt()?;
                    }
                    "s" | "save" => save_report(&session, &setup)?,
                    "n" | "new" => {
                        session.start_new()?;
                    }
                    "q" | "quit" => break,
                    other => println!("Unknown command: {other}"),
                }
            }
            Phase::Review => {
                if entered {
                    print_review(&session, ReviewFilter::All);
                }
                let Some(line) = prompt(
                    &mut lines,
                    "Filter (all, correct, incorrect, unattempted), [e]xit review, [n]ew quiz: ",
                )
                .await
                else {
                    break;
                };
                match line.as_str() {
                    "e" | "exit" | "back" => {
                        session.exit_review()?;
                    }
                    "n" | "new" => {
                        session.start_new()?;
                    }
                    "q" | "quit" => break,
                    other => match other.parse::<ReviewFilter>() {
                        Ok(filter) => print_review(&session, filter),
                        Err(e) => println!("{e}"),
                    },
                }
            }
        }
    }

    Ok(())
}

/// Run the active attempt until it is submitted or time runs out.
async fn run_active(session: &mut QuizSession, lines: &mut mpsc::Receiver<String>) -> Result<()> {
    let quiz = session.shared_quiz().context("no quiz in active phase")?;
    anyhow::ensure!(!quiz.is_empty(), "quiz has no questions");

    let mut current = 0usize;
    show_question(session, &quiz, current);

    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while session.phase() == Phase::Active {
        let id = quiz.questions[current].id;

        tokio::select! {
            _ = ticker.tick() => {
                if session.tick(Some(id), TICK.as_secs()).is_some() {
                    println!("\nTime is up! Your answers have been submitted.");
                    break;
                }
                if let Some(left) = session.remaining_secs() {
                    if TIME_WARNINGS_SECS.contains(&left) {
                        println!("\n  {} left", format_clock(left));
                    }
                }
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    session.submit_answers()?;
                    break;
                };
                match parse_active_command(&line) {
                    Some(ActiveCommand::Select(index)) => {
                        session.select_option(id, index);
                        show_question(session, &quiz, current);
                    }
                    Some(ActiveCommand::Clear) => {
                        session.clear_selection(id);
                        show_question(session, &quiz, current);
                    }
                    Some(ActiveCommand::Mark) => match session.toggle_mark(id) {
                        Some(true) => println!("  Marked for review."),
                        Some(false) => println!("  Review mark removed."),
                        None => {}
                    },
                    Some(ActiveCommand::Next) => {
                        current = (current + 1).min(quiz.len() - 1);
                        show_question(session, &quiz, current);
                    }
                    Some(ActiveCommand::Prev) => {
                        current = current.saturating_sub(1);
                        show_question(session, &quiz, current);
                    }
                    Some(ActiveCommand::Goto(number)) if number <= quiz.len() => {
                        current = number - 1;
                        show_question(session, &quiz, current);
                    }
                    Some(ActiveCommand::Goto(number)) => {
                        println!("  There is no question {number}.");
                    }
                    Some(ActiveCommand::Palette) => {
                        if let Some(sheet) = session.answers() {
                            print_palette(sheet, current);
                        }
                    }
                    Some(ActiveCommand::Submit) => {
                        session.submit_answers()?;
                    }
                    Some(ActiveCommand::Help) => println!("{ACTIVE_HELP}"),
                    None => println!("  Unknown command, type 'h' for help."),
                }
            }
        }
    }

    Ok(())
}

fn show_question(session: &mut QuizSession, quiz: &Quiz, current: usize) {
    let question = &quiz.questions[current];
    session.visit(question.id);

    let record = session.answers().and_then(|s| s.get(question.id));
    let selected = record.and_then(|r| r.selected_option);
    let marked = record.is_some_and(|r| r.is_marked);
    let left = session.remaining_secs().unwrap_or(0);

    println!(
        "\nQ{}/{}  [{} left]{}",
        current + 1,
        quiz.len(),
        format_clock(left),
        if marked { "  (marked for review)" } else { "" }
    );
    println!("{}", question.text);
    if let Some(reference) = &question.reference {
        println!("  ({reference})");
    }
    for (i, option) in question.options.iter().enumerate() {
        let cursor = if selected == Some(i) { '*' } else { ' ' };
        println!(" {cursor} {}. {option}", (b'A' + i as u8) as char);
    }
}

fn print_ready(session: &QuizSession) {
    if let Some(quiz) = session.quiz() {
        println!(
            "\nQuiz ready: {} ({} questions, {} allowed)",
            quiz.title,
            quiz.len(),
            format_clock(session.time_allowance_secs().unwrap_or(0))
        );
    }
}

fn print_instructions(session: &QuizSession) -> Result<()> {
    let quiz = session.quiz().context("no quiz to show instructions for")?;
    let settings = session.settings();
    let sheet = InstructionSheet::new(
        settings.language,
        &quiz.title,
        quiz.len(),
        session.time_allowance_secs().unwrap_or(0),
        settings.negative_marking,
    );
    println!("\n{}", sheet.to_text());
    println!("{}", sheet.agree_label);
    Ok(())
}

fn print_review(session: &QuizSession, filter: ReviewFilter) {
    if let Some(view) = session.review_view() {
        println!("\n{}", review_markdown(view, filter));
    }
}

/// Export failures are reported but never interrupt the quiz.
fn export_quiz(session: &QuizSession, setup: &Setup) {
    let Some(bundle) = session.export_bundle() else {
        return;
    };
    let path = setup.output_dir.join(export_file_name(&bundle.quiz.title));
    match write_quiz_html(&bundle, &setup.config.branding, &path) {
        Ok(()) => println!("Quiz exported to {}", path.display()),
        Err(e) => tracing::warn!("quiz export failed: {e:#}"),
    }
}

fn save_report(session: &QuizSession, setup: &Setup) -> Result<()> {
    let view = session
        .review_view()
        .context("no finished attempt to save")?;
    let report = AttemptReport::from_view(view, session.settings().language);
    let path = setup.output_dir.join(report.file_name());
    report.save_json(&path)?;
    println!("Attempt saved to {}", path.display());
    Ok(())
}
