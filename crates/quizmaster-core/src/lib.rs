//! quizmaster-core — Quiz session state machine, answer tracking, and scoring.
//!
//! This crate defines the data model, the question source trait, and the
//! session lifecycle that the rest of quizmaster builds on.

pub mod error;
pub mod instructions;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod report;
pub mod results;
pub mod scoring;
pub mod session;
pub mod slides;
pub mod tracker;
pub mod traits;
