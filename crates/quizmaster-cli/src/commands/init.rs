//! The `quizmaster init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("quizmaster.toml").exists() {
        println!("quizmaster.toml already exists, skipping.");
    } else {
        std::fs::write("quizmaster.toml", SAMPLE_CONFIG)?;
        println!("Created quizmaster.toml");
    }

    std::fs::create_dir_all("quizzes")?;
    let sample_path = Path::new("quizzes/sample.toml");
    if sample_path.exists() {
        println!("quizzes/sample.toml already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_QUIZ)?;
        println!("Created quizzes/sample.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set QUIZMASTER_GEMINI_KEY (or edit quizmaster.toml)");
    println!("  2. Run: quizmaster take --quiz-file quizzes/sample.toml");
    println!("  3. Run: quizmaster take --topic \"Indian rivers\" --questions 25");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizmaster configuration

default_provider = "gemini"
default_model = "gemini-2.5-flash"
default_temperature = 0.7
# "hi" or "en"
language = "hi"
# 25, 50, 75 or 100
question_count = 50
max_retries = 3
retry_delay_ms = 1000
output_dir = "./quizmaster-output"

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[branding]
app_name = "Apni Taiyarii"
youtube_link = "https://www.youtube.com/@apnitaiyarii"
telegram_link = "https://t.me/apnitaiyarii"
"#;

const SAMPLE_QUIZ: &str = r#"[quiz]
title = "Sample Quiz"

[[questions]]
id = 1
text = "Which planet is known as the Red Planet?"
options = ["Venus", "Jupiter", "Mars", "Mercury"]
correct_index = 2
explanation = "Iron oxide on its surface gives Mars its reddish colour."

[[questions]]
id = 2
text = "What is the chemical symbol for gold?"
options = ["Ag", "Au", "Gd", "Go"]
correct_index = 1
explanation = "Au comes from the Latin word aurum."

[[questions]]
id = 3
text = "How many sides does a hexagon have?"
options = ["5", "6", "7", "8"]
correct_index = 1
explanation = "Hexa- means six."
"#;
