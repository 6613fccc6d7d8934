//! Configuration loading and question source factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizmaster_core::error::QuizError;
use quizmaster_core::model::{Branding, Language, DEFAULT_QUESTION_COUNT};
use quizmaster_core::session::SessionSettings;
use quizmaster_core::traits::QuestionSource;

use crate::gemini::GeminiSource;
use crate::openai::OpenAiSource;
use crate::retry::RetryingSource;

/// Configuration for a single question source backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

impl ProviderConfig {
    fn api_key(&self) -> &str {
        match self {
            ProviderConfig::OpenAI { api_key, .. } | ProviderConfig::Gemini { api_key, .. } => {
                api_key
            }
        }
    }
}

/// Top-level quizmaster configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizmasterConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default model to use.
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    /// Language questions are generated in.
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    /// Max retries on transient provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Output directory for exports and attempt reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub branding: Branding,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_question_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizmaster-output")
}

impl Default for QuizmasterConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            language: Language::default(),
            question_count: default_question_count(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            output_dir: default_output_dir(),
            branding: Branding::default(),
        }
    }
}

impl QuizmasterConfig {
    /// Session settings derived from the configured defaults.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            model: self.default_model.clone(),
            language: self.language,
            question_count: self.question_count,
            temperature: self.default_temperature,
            ..SessionSettings::default()
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizmaster.toml` in the current directory
/// 2. `~/.config/quizmaster/config.toml`
///
/// Environment variable overrides: `QUIZMASTER_GEMINI_KEY`, `QUIZMASTER_OPENAI_KEY`.
pub fn load_config() -> Result<QuizmasterConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizmasterConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizmaster.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizmasterConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizmasterConfig::default(),
    };

    apply_env_overrides(&mut config);

    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn apply_env_overrides(config: &mut QuizmasterConfig) {
    if let Ok(key) = std::env::var("QUIZMASTER_GEMINI_KEY") {
        let entry = config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Gemini { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("QUIZMASTER_OPENAI_KEY") {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizmaster"))
}

/// Create a source instance from its configuration.
///
/// A key that resolves empty is a configuration error; the caller should
/// build an unconfigured session from it.
pub fn create_source(
    name: &str,
    config: &ProviderConfig,
) -> Result<Box<dyn QuestionSource>, QuizError> {
    if config.api_key().trim().is_empty() {
        return Err(missing_key(name));
    }
    Ok(match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Box::new(OpenAiSource::new(api_key, base_url.clone(), org_id.clone())),
        ProviderConfig::Gemini { api_key, base_url } => {
            Box::new(GeminiSource::new(api_key, base_url.clone()))
        }
    })
}

/// Look up `name` (or the default provider) and wrap it in the retry policy.
pub fn source_from_config(
    config: &QuizmasterConfig,
    name: Option<&str>,
) -> Result<Arc<dyn QuestionSource>, QuizError> {
    let name = name.unwrap_or(&config.default_provider);
    let provider = config.providers.get(name).ok_or_else(|| missing_key(name))?;
    let source = create_source(name, provider)?;
    Ok(Arc::new(RetryingSource::new(
        Arc::from(source),
        config.max_retries,
        Duration::from_millis(config.retry_delay_ms),
    )))
}

fn missing_key(name: &str) -> QuizError {
    QuizError::Configuration(format!(
        "API key is not configured for provider '{name}'. Set QUIZMASTER_{}_KEY or add [providers.{name}] to quizmaster.toml.",
        name.to_uppercase()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZMASTER_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZMASTER_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZMASTER_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_QUIZMASTER_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizmasterConfig::default();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.default_model, "gemini-2.5-flash");
        assert_eq!(config.language, Language::Hindi);
        assert_eq!(config.question_count, 50);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.branding.app_name, "Apni Taiyarii");
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "openai"
default_model = "gpt-4.1-mini"
language = "en"
question_count = 25

[providers.openai]
type = "openai"
api_key = "sk-openai"

[providers.gemini]
type = "gemini"
api_key = "g-key"

[branding]
app_name = "My Prep"
"#;
        let config: QuizmasterConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert!(matches!(
            config.providers.get("gemini"),
            Some(ProviderConfig::Gemini { .. })
        ));
        assert_eq!(config.language, Language::English);
        assert_eq!(config.branding.app_name, "My Prep");
        assert_eq!(config.branding.telegram_link, "https://t.me/apnitaiyarii");

        let settings = config.session_settings();
        assert_eq!(settings.model, "gpt-4.1-mini");
        assert_eq!(settings.question_count, 25);
    }

    #[test]
    fn debug_masks_keys() {
        let config = ProviderConfig::Gemini {
            api_key: "super-secret".into(),
            base_url: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn empty_key_is_a_configuration_error() {
        let config = ProviderConfig::Gemini {
            api_key: "".into(),
            base_url: None,
        };
        let err = create_source("gemini", &config).err().unwrap();
        assert!(matches!(err, QuizError::Configuration(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn unknown_provider_is_a_configuration_error() {
        let config = QuizmasterConfig::default();
        let err = source_from_config(&config, Some("openai")).err().unwrap();
        assert!(err.to_string().contains("QUIZMASTER_OPENAI_KEY"));
    }

    #[test]
    fn configured_source_is_wrapped() {
        let mut config = QuizmasterConfig::default();
        config.providers.insert(
            "gemini".into(),
            ProviderConfig::Gemini {
                api_key: "k".into(),
                base_url: None,
            },
        );
        let source = source_from_config(&config, None).unwrap();
        assert_eq!(source.name(), "gemini");
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizmaster.toml");
        std::fs::write(&path, "question_count = 75\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.question_count, 75);

        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
