//! Quiz parsing and validation.
//!
//! Loads quizzes from TOML quiz files, turns raw LLM responses into quizzes
//! and slide decks, and validates question sets.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionId, Quiz, OPTION_COUNT};
use crate::slides::SlideDeck;

/// Intermediate TOML structure for quiz files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuizHeader {
    title: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuestion {
    id: QuestionId,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    options: Vec<String>,
    correct_index: usize,
    #[serde(default)]
    explanation: String,
}

/// Parse a TOML quiz file.
pub fn parse_quiz_file(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a TOML string into a `Quiz` (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            text: q.text,
            reference: q.reference,
            options: q.options,
            correct_index: q.correct_index,
            explanation: q.explanation,
        })
        .collect();

    Ok(Quiz {
        title: parsed.quiz.title,
        questions,
    })
}

/// Serialize a quiz to the TOML quiz-file format.
pub fn quiz_to_toml(quiz: &Quiz) -> Result<String> {
    let file = TomlQuizFile {
        quiz: TomlQuizHeader {
            title: quiz.title.clone(),
        },
        questions: quiz
            .questions
            .iter()
            .map(|q| TomlQuestion {
                id: q.id,
                text: q.text.clone(),
                reference: q.reference.clone(),
                options: q.options.clone(),
                correct_index: q.correct_index,
                explanation: q.explanation.clone(),
            })
            .collect(),
    };
    toml::to_string_pretty(&file).context("failed to serialize quiz to TOML")
}

/// Write a quiz to a TOML quiz file, creating parent directories.
pub fn write_quiz_file(quiz: &Quiz, path: &Path) -> Result<()> {
    let content = quiz_to_toml(quiz)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write quiz file: {}", path.display()))
}

/// Load every `.toml` quiz file under `dir`, recursing into subdirectories.
/// Files that fail to parse are skipped with a warning.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();

        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_quiz_file(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => tracing::warn!("skipping {}: {e:#}", path.display()),
            }
        }
    }

    Ok(quizzes)
}

// ---------------------------------------------------------------------------
// LLM responses
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuiz {
    #[serde(alias = "title")]
    quiz_title: String,
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(alias = "question")]
    text: String,
    #[serde(default)]
    reference: Option<String>,
    options: Vec<String>,
    #[serde(alias = "correct_index", alias = "correctOptionIndex")]
    correct_index: usize,
    #[serde(default)]
    explanation: String,
}

/// Extract JSON from a markdown-formatted LLM response.
///
/// Handles:
/// - ```json``` blocks (preferred)
/// - Generic ``` blocks (if no json-specific block found)
/// - Raw JSON with no markdown blocks (returned trimmed)
pub fn extract_json_from_markdown(response: &str) -> String {
    let mut json_block: Option<String> = None;
    let mut generic_block: Option<String> = None;
    let mut in_block = false;
    let mut is_json_block = false;
    let mut is_generic_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();

        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            let lang = trimmed.trim_start_matches('`').trim().to_lowercase();
            is_json_block = lang == "json";
            is_generic_block = lang.is_empty();
            current_block.clear();
            continue;
        }

        if in_block && trimmed == "```" {
            in_block = false;
            if is_json_block && json_block.is_none() {
                json_block = Some(current_block.clone());
            } else if is_generic_block && generic_block.is_none() {
                generic_block = Some(current_block.clone());
            }
            current_block.clear();
            continue;
        }

        if in_block {
            if !current_block.is_empty() {
                current_block.push('\n');
            }
            current_block.push_str(line);
        }
    }

    // Truncated (unclosed) block
    if in_block && !current_block.is_empty() {
        if is_json_block && json_block.is_none() {
            json_block = Some(current_block);
        } else if is_generic_block && generic_block.is_none() {
            generic_block = Some(current_block);
        }
    }

    json_block
        .or(generic_block)
        .unwrap_or_else(|| response.trim().to_string())
}

/// Parse an LLM quiz response. Questions are renumbered 1..=N in order.
pub fn parse_quiz_response(content: &str) -> Result<Quiz> {
    let json = extract_json_from_markdown(content);
    let raw: RawQuiz =
        serde_json::from_str(&json).context("response is not a valid quiz JSON object")?;

    let questions = raw
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| Question {
            id: i as QuestionId + 1,
            text: q.text.trim().to_string(),
            reference: q
                .reference
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            options: q.options.into_iter().map(|o| o.trim().to_string()).collect(),
            correct_index: q.correct_index,
            explanation: q.explanation.trim().to_string(),
        })
        .collect();

    Ok(Quiz {
        title: raw.quiz_title.trim().to_string(),
        questions,
    })
}

/// Parse an LLM presentation response.
pub fn parse_presentation_response(content: &str) -> Result<SlideDeck> {
    let json = extract_json_from_markdown(content);
    serde_json::from_str(&json).context("response is not a valid presentation JSON object")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A problem found while validating a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The question ID (if applicable).
    pub question_id: Option<QuestionId>,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.question_id {
            Some(id) => write!(f, "question {id}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Validate a quiz. An empty list means the quiz can be taken.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let quiz_issue = |message: &str| ValidationIssue {
        question_id: None,
        message: message.to_string(),
    };

    if quiz.title.trim().is_empty() {
        issues.push(quiz_issue("quiz title is empty"));
    }
    if quiz.questions.is_empty() {
        issues.push(quiz_issue("quiz has no questions"));
    }

    let mut seen_ids = HashSet::new();
    for q in &quiz.questions {
        let mut issue = |message: String| {
            issues.push(ValidationIssue {
                question_id: Some(q.id),
                message,
            })
        };
        if !seen_ids.insert(q.id) {
            issue(format!("duplicate question ID: {}", q.id));
        }
        if q.text.trim().is_empty() {
            issue("question text is empty".into());
        }
        if q.options.len() != OPTION_COUNT {
            issue(format!(
                "has {} options, expected {OPTION_COUNT}",
                q.options.len()
            ));
        }
        if q.options.iter().any(|o| o.trim().is_empty()) {
            issue("has an empty option".into());
        }
        if q.correct_index >= q.options.len().min(OPTION_COUNT) {
            issue(format!("correct index {} is out of range", q.correct_index));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[quiz]
title = "Indian Geography"

[[questions]]
id = 1
text = "Which is the longest river in India?"
reference = "NCERT Geography, Class 9"
options = ["Ganga", "Godavari", "Yamuna", "Narmada"]
correct_index = 0
explanation = "The Ganga flows about 2,525 km."

[[questions]]
id = 2
text = "Which state has the longest coastline?"
options = ["Tamil Nadu", "Gujarat", "Andhra Pradesh", "Kerala"]
correct_index = 1
"#;

    fn sample_quiz() -> Quiz {
        parse_quiz_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap()
    }

    #[test]
    fn parse_valid_toml() {
        let quiz = sample_quiz();
        assert_eq!(quiz.title, "Indian Geography");
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(
            quiz.questions[0].reference.as_deref(),
            Some("NCERT Geography, Class 9")
        );
        assert!(quiz.questions[1].explanation.is_empty());
        assert!(validate_quiz(&quiz).is_empty());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_quiz_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn toml_write_and_reload() {
        let quiz = sample_quiz();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quiz.toml");

        write_quiz_file(&quiz, &path).unwrap();
        let loaded = parse_quiz_file(&path).unwrap();
        assert_eq!(loaded, quiz);
    }

    #[test]
    fn directory_load_skips_broken_files() {
        let quiz = sample_quiz();
        let dir = tempfile::tempdir().unwrap();
        write_quiz_file(&quiz, &dir.path().join("a.toml")).unwrap();
        write_quiz_file(&quiz, &dir.path().join("sub").join("b.toml")).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not = [valid").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let loaded = load_quiz_directory(dir.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(load_quiz_directory(&dir.path().join("a.toml")).is_err());
    }

    #[test]
    fn validate_catches_structural_problems() {
        let mut quiz = sample_quiz();
        quiz.questions[1].id = 1;
        quiz.questions[1].options.pop();
        quiz.questions[1].correct_index = 3;
        let issues = validate_quiz(&quiz);
        assert!(issues.iter().any(|i| i.message.contains("duplicate")));
        assert!(issues.iter().any(|i| i.message.contains("expected 4")));
        assert!(issues.iter().any(|i| i.message.contains("out of range")));
    }

    #[test]
    fn validate_empty_quiz() {
        let quiz = Quiz {
            title: " ".into(),
            questions: vec![],
        };
        let issues = validate_quiz(&quiz);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[1].to_string(), "quiz has no questions");
    }

    #[test]
    fn extract_json_block() {
        let input = "Here you go:\n\n```json\n{\"a\": 1}\n```\n\nEnjoy!";
        assert_eq!(extract_json_from_markdown(input), "{\"a\": 1}");
    }

    #[test]
    fn extract_prefers_json_over_generic() {
        let input = "```\nnot this\n```\n\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract_json_from_markdown(input), "{\"b\": 2}");
    }

    #[test]
    fn extract_raw_json() {
        assert_eq!(extract_json_from_markdown("  {\"c\": 3}\n"), "{\"c\": 3}");
    }

    #[test]
    fn extract_truncated_block() {
        let input = "```json\n{\"d\": 4}";
        assert_eq!(extract_json_from_markdown(input), "{\"d\": 4}");
    }

    #[test]
    fn parse_response_renumbers_and_trims() {
        let response = r#"```json
{
  "quizTitle": " Solar System ",
  "questions": [
    {"id": 7, "text": "Largest planet?", "options": ["Jupiter", "Saturn", "Earth", "Mars"], "correctIndex": 0, "explanation": "Jupiter is largest."},
    {"id": 7, "text": "Closest to the Sun?", "reference": " ", "options": ["Venus", "Mercury", "Mars", "Earth"], "correctIndex": 1, "explanation": ""}
  ]
}
```"#;
        let quiz = parse_quiz_response(response).unwrap();
        assert_eq!(quiz.title, "Solar System");
        assert_eq!(quiz.questions[0].id, 1);
        assert_eq!(quiz.questions[1].id, 2);
        assert!(quiz.questions[1].reference.is_none());
        assert!(validate_quiz(&quiz).is_empty());
    }

    #[test]
    fn parse_response_rejects_garbage() {
        assert!(parse_quiz_response("I cannot help with that.").is_err());
    }

    #[test]
    fn parse_presentation() {
        let deck = parse_presentation_response(
            r#"{"presentationTitle": "Cells", "slides": [{"slideNumber": 1, "slideTitle": "Cells", "slideType": "TitleSlide", "content": []}]}"#,
        )
        .unwrap();
        assert_eq!(deck.title, "Cells");
        assert_eq!(deck.slides.len(), 1);
    }
}
