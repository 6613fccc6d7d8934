//! OpenAI-compatible chat completions source.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizmaster_core::error::ProviderError;
use quizmaster_core::model::Quiz;
use quizmaster_core::prompt::{
    presentation_prompt, quiz_prompt, PRESENTATION_SYSTEM_PROMPT, QUIZ_SYSTEM_PROMPT,
};
use quizmaster_core::slides::SlideDeck;
use quizmaster_core::traits::{ModelInfo, PresentationRequest, QuestionSource, QuizRequest};

use crate::http::{build_client, check_status, deck_from_text, quiz_from_text, send_error};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Source backed by any OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct OpenAiSource {
    api_key: String,
    base_url: String,
    org_id: Option<String>,
    client: reqwest::Client,
}

impl OpenAiSource {
    pub fn new(api_key: &str, base_url: Option<String>, org_id: Option<String>) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            org_id,
            client: build_client(),
        }
    }

    #[instrument(skip(self, system, prompt))]
    async fn complete(
        &self,
        model: &str,
        temperature: f64,
        system: &str,
        prompt: String,
    ) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: model.to_string(),
            temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
        };

        let mut req = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json");

        if let Some(org) = &self.org_id {
            req = req.header("OpenAI-Organization", org);
        }

        let response = req.json(&body).send().await.map_err(send_error)?;
        let response = check_status(response, model).await?;

        let api_response: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            }
        })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        tracing::debug!(
            prompt_tokens = api_response.usage.prompt_tokens,
            completion_tokens = api_response.usage.completion_tokens,
            "completion received"
        );
        if content.trim().is_empty() {
            return Err(ProviderError::InvalidResponse("empty completion".into()));
        }
        Ok(content)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    temperature: f64,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: ChatUsage,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize, Default)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[async_trait]
impl QuestionSource for OpenAiSource {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate_quiz(&self, request: &QuizRequest) -> anyhow::Result<Quiz> {
        let text = self
            .complete(
                &request.model,
                request.temperature,
                QUIZ_SYSTEM_PROMPT,
                quiz_prompt(request),
            )
            .await?;
        Ok(quiz_from_text(&text, &request.input)?)
    }

    async fn generate_presentation(
        &self,
        request: &PresentationRequest,
    ) -> anyhow::Result<SlideDeck> {
        let text = self
            .complete(
                &request.model,
                request.temperature,
                PRESENTATION_SYSTEM_PROMPT,
                presentation_prompt(request),
            )
            .await?;
        Ok(deck_from_text(&text)?)
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "gpt-4.1".into(),
                name: "GPT-4.1".into(),
                provider: "openai".into(),
                max_context: 1_000_000,
            },
            ModelInfo {
                id: "gpt-4.1-mini".into(),
                name: "GPT-4.1 Mini".into(),
                provider: "openai".into(),
                max_context: 1_000_000,
            },
            ModelInfo {
                id: "gpt-4o-mini".into(),
                name: "GPT-4o Mini".into(),
                provider: "openai".into(),
                max_context: 128_000,
            },
        ]
    }
}
