//! quizmaster-providers — Question source integrations.
//!
//! Implements the `QuestionSource` trait for Gemini, OpenAI-compatible APIs,
//! and TOML quiz files, plus a retrying wrapper and a mock for tests.

pub mod config;
pub mod file;
pub mod gemini;
mod http;
pub mod mock;
pub mod openai;
pub mod retry;

pub use config::{create_source, load_config, load_config_from, ProviderConfig, QuizmasterConfig};
pub use quizmaster_core::error::ProviderError;
