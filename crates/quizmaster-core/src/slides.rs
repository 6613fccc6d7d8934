//! Presentation slide decks generated alongside quizzes.

use serde::{Deserialize, Serialize};

use crate::model::OPTION_COUNT;

/// Layout of a single slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlideKind {
    /// Deck title; `content[0]` is an optional subtitle.
    TitleSlide,
    /// Bullet points or paragraphs.
    ContentSlide,
    /// Multiple-choice question; `content[0]` is the question text.
    QuestionSlide,
    ExplanationSlide,
    SectionHeaderSlide,
    /// `content` describes the image.
    ImageSlide,
    ThankYouSlide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    #[serde(rename = "slideNumber")]
    pub number: u32,
    #[serde(rename = "slideTitle")]
    pub title: String,
    #[serde(rename = "slideType")]
    pub kind: SlideKind,
    #[serde(default)]
    pub content: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_option_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Speaker notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideDeck {
    #[serde(rename = "presentationTitle")]
    pub title: String,
    pub slides: Vec<Slide>,
}

impl SlideDeck {
    /// Problems that make the deck unusable, one message per problem.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.title.trim().is_empty() {
            problems.push("presentation title is empty".to_string());
        }
        if self.slides.is_empty() {
            problems.push("presentation has no slides".to_string());
        }
        for slide in &self.slides {
            if slide.kind != SlideKind::QuestionSlide {
                continue;
            }
            let options = slide.options.as_deref().unwrap_or_default();
            if options.len() != OPTION_COUNT {
                problems.push(format!(
                    "slide {} has {} options, expected {OPTION_COUNT}",
                    slide.number,
                    options.len()
                ));
            }
            match slide.correct_option_index {
                Some(i) if i < options.len() => {}
                _ => problems.push(format!(
                    "slide {} has no valid correct option",
                    slide.number
                )),
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck_json() -> &'static str {
        r#"{
            "presentationTitle": "Rivers of India",
            "slides": [
                {"slideNumber": 1, "slideTitle": "Rivers of India", "slideType": "TitleSlide", "content": ["An overview"]},
                {"slideNumber": 2, "slideTitle": "Quick check", "slideType": "QuestionSlide",
                 "content": ["Longest river?"], "options": ["Ganga", "Yamuna", "Godavari", "Kaveri"],
                 "correctOptionIndex": 0, "explanation": "The Ganga is the longest."},
                {"slideNumber": 3, "slideTitle": "Thank you", "slideType": "ThankYouSlide"}
            ]
        }"#
    }

    #[test]
    fn parses_camel_case_deck() {
        let deck: SlideDeck = serde_json::from_str(deck_json()).unwrap();
        assert_eq!(deck.title, "Rivers of India");
        assert_eq!(deck.slides.len(), 3);
        assert_eq!(deck.slides[1].kind, SlideKind::QuestionSlide);
        assert_eq!(deck.slides[1].correct_option_index, Some(0));
        assert!(deck.slides[2].content.is_empty());
        assert!(deck.problems().is_empty());
    }

    #[test]
    fn question_slide_needs_four_options() {
        let mut deck: SlideDeck = serde_json::from_str(deck_json()).unwrap();
        deck.slides[1].options = Some(vec!["only".into()]);
        let problems = deck.problems();
        assert!(problems.iter().any(|p| p.contains("expected 4")));
        assert!(problems.iter().any(|p| p.contains("no valid correct option")));
    }
}
