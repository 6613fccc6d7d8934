//! End-to-end generation tests against a mocked Gemini endpoint.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(dir: &Path, base_url: &str) -> std::path::PathBuf {
    let config_path = dir.join("quizmaster.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
default_provider = "gemini"
default_model = "gemini-2.5-flash"
max_retries = 0

[providers.gemini]
type = "gemini"
api_key = "test-key"
base_url = "{base_url}"
"#
        ),
    )
    .unwrap();
    config_path
}

fn candidate(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    })
}

fn quizmaster_in(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizmaster").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("QUIZMASTER_GEMINI_KEY");
    cmd
}

const QUIZ_JSON: &str = r#"{"quizTitle": "Rivers", "questions": [
    {"id": 1, "text": "Longest river in India?", "options": ["Ganga", "Yamuna", "Kaveri", "Narmada"], "correctIndex": 0, "explanation": "The Ganga."},
    {"id": 2, "text": "Which river is called Dakshin Ganga?", "options": ["Krishna", "Godavari", "Kaveri", "Tapti"], "correctIndex": 1, "explanation": "The Godavari."}
]}"#;

#[tokio::test(flavor = "multi_thread")]
async fn generate_writes_html_and_quiz_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(QUIZ_JSON)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), &server.uri());
    let out = dir.path().join("out");

    quizmaster_in(dir.path())
        .arg("generate")
        .arg("--topic")
        .arg("Rivers")
        .arg("--questions")
        .arg("25")
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated \"Rivers\" (2 questions)"));

    let html = std::fs::read_to_string(out.join("rivers-quiz.html")).unwrap();
    assert!(html.contains("Dakshin Ganga"));

    quizmaster_in(dir.path())
        .arg("validate")
        .arg("--quiz")
        .arg(out.join("rivers-quiz.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("All quizzes valid"));
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_surfaces_provider_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), &server.uri());

    quizmaster_in(dir.path())
        .arg("generate")
        .arg("--topic")
        .arg("Rivers")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to generate questions"));
}

#[tokio::test(flavor = "multi_thread")]
async fn present_writes_deck() {
    let server = MockServer::start().await;
    let deck = r#"{"presentationTitle": "Photosynthesis", "slides": [
        {"slideNumber": 1, "slideTitle": "Photosynthesis", "slideType": "TitleSlide", "content": ["How plants make food"]},
        {"slideNumber": 2, "slideTitle": "Thank you", "slideType": "ThankYouSlide", "content": []}
    ]}"#;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(deck)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), &server.uri());
    let out = dir.path().join("out");

    quizmaster_in(dir.path())
        .arg("present")
        .arg("--topic")
        .arg("Photosynthesis")
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 slides)"));

    assert!(out.join("photosynthesis-presentation.html").exists());
}
