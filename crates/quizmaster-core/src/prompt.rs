//! Prompt construction for quiz and presentation generation.

use crate::model::OPTION_COUNT;
use crate::traits::{PresentationRequest, QuizInput, QuizRequest};

/// Default system prompt for quiz generation.
pub const QUIZ_SYSTEM_PROMPT: &str = "You are an expert exam setter for competitive examinations. You write accurate, unambiguous multiple-choice questions and respond ONLY with a single JSON object, without commentary.";

/// Default system prompt for presentation generation.
pub const PRESENTATION_SYSTEM_PROMPT: &str = "You are an expert teacher who designs clear, engaging slide presentations. You respond ONLY with a single JSON object, without commentary.";

const QUIZ_SHAPE: &str = r#"{
  "quizTitle": "short descriptive title",
  "questions": [
    {
      "id": 1,
      "text": "question text",
      "reference": "optional source reference, omit if unknown",
      "options": ["option A", "option B", "option C", "option D"],
      "correctIndex": 0,
      "explanation": "why the correct option is correct"
    }
  ]
}"#;

const DECK_SHAPE: &str = r#"{
  "presentationTitle": "title",
  "slides": [
    {
      "slideNumber": 1,
      "slideTitle": "title",
      "slideType": "TitleSlide | ContentSlide | QuestionSlide | ExplanationSlide | SectionHeaderSlide | ImageSlide | ThankYouSlide",
      "content": ["text"],
      "options": ["only for QuestionSlide, exactly 4"],
      "correctOptionIndex": 0,
      "explanation": "only for QuestionSlide",
      "notes": "optional speaker notes"
    }
  ]
}"#;

/// Build the user prompt for a quiz request.
pub fn quiz_prompt(request: &QuizRequest) -> String {
    let mut prompt = String::new();
    match &request.input {
        QuizInput::Topic(topic) => {
            prompt.push_str(&format!(
                "Create {} multiple-choice questions about the topic: \"{}\".\n",
                request.question_count,
                topic.trim()
            ));
        }
        QuizInput::Text { text, instructions } => {
            prompt.push_str(&format!(
                "Create {} multiple-choice questions based strictly on the following text.\n\n\
                 --- TEXT START ---\n{}\n--- TEXT END ---\n",
                request.question_count,
                text.trim()
            ));
            if let Some(extra) = instructions.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                prompt.push_str(&format!("\nAdditional instructions: {extra}\n"));
            }
        }
    }
    prompt.push_str(&format!(
        "\nWrite every question, option, explanation and the title in {}.\n\
         Each question must have exactly {OPTION_COUNT} options with exactly one correct option; \
         `correctIndex` is the 0-based index of the correct option.\n\
         Respond with JSON of this shape:\n{QUIZ_SHAPE}\n",
        request.language.name()
    ));
    prompt
}

/// Build the user prompt for a presentation request.
pub fn presentation_prompt(request: &PresentationRequest) -> String {
    let subject = match &request.input {
        QuizInput::Topic(topic) => format!("the topic \"{}\"", topic.trim()),
        QuizInput::Text { text, instructions } => {
            let mut s = format!("the following text:\n--- TEXT START ---\n{}\n--- TEXT END ---", text.trim());
            if let Some(extra) = instructions.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                s.push_str(&format!("\nAdditional instructions: {extra}"));
            }
            s
        }
    };
    format!(
        "Create a slide presentation on {subject}.\n\
         Start with a TitleSlide, end with a ThankYouSlide, and include a few QuestionSlides \
         with {OPTION_COUNT} options each to check understanding.\n\
         Write all text in {}.\n\
         Respond with JSON of this shape:\n{DECK_SHAPE}\n",
        request.language.name()
    )
}
