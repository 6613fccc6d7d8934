//! quizmaster-report — Exports and review rendering.
//!
//! Standalone HTML quiz documents, HTML slide decks, and markdown answer
//! reviews.

pub mod html;
pub mod review;
pub mod slides;

pub use html::{export_file_name, generate_quiz_html, write_quiz_html};
pub use review::{review_entries, review_markdown, ReviewEntry, ReviewFilter};
pub use slides::{deck_file_name, generate_deck_html, write_deck_html};
