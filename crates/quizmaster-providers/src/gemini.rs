//! Google Gemini `generateContent` source.

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

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini API source. Responses are requested as `application/json`.
pub struct GeminiSource {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiSource {
    pub fn new(api_key: &str, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: build_client(),
        }
    }

    #[instrument(skip(self, system, prompt))]
    async fn generate(
        &self,
        model: &str,
        temperature: f64,
        system: &str,
        prompt: String,
    ) -> Result<String, ProviderError> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{model}:generateContent",
                self.base_url
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(send_error)?;
        let response = check_status(response, model).await?;

        let api_response: GenerateContentResponse = response.json().await.map_err(|e| {
            ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            }
        })?;

        if let Some(reason) = api_response
            .prompt_feedback
            .and_then(|f| f.block_reason)
        {
            return Err(ProviderError::InvalidResponse(format!(
                "prompt blocked: {reason}"
            )));
        }

        let text: String = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ProviderError::InvalidResponse("no candidates returned".into()));
        }
        Ok(text)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[async_trait]
impl QuestionSource for GeminiSource {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_quiz(&self, request: &QuizRequest) -> anyhow::Result<Quiz> {
        let text = self
            .generate(
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
            .generate(
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
                id: "gemini-2.5-flash".into(),
                name: "Gemini 2.5 Flash".into(),
                provider: "gemini".into(),
                max_context: 1_048_576,
            },
            ModelInfo {
                id: "gemini-2.5-pro".into(),
                name: "Gemini 2.5 Pro".into(),
                provider: "gemini".into(),
                max_context: 1_048_576,
            },
            ModelInfo {
                id: "gemini-2.0-flash".into(),
                name: "Gemini 2.0 Flash".into(),
                provider: "gemini".into(),
                max_context: 1_048_576,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizmaster_core::model::Language;
    use quizmaster_core::slides::SlideKind;
    use quizmaster_core::traits::QuizInput;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn candidate(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}]
        })
    }

    fn request(input: QuizInput) -> QuizRequest {
        QuizRequest {
            model: "gemini-2.5-flash".into(),
            input,
            question_count: 2,
            language: Language::Hindi,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn generates_quiz_from_json_candidate() {
        let server = MockServer::start().await;
        let quiz_json = r#"{"quizTitle": "नदियाँ", "questions": [
            {"id": 1, "text": "सबसे लंबी नदी?", "options": ["गंगा", "यमुना", "गोदावरी", "कावेरी"], "correctIndex": 0, "explanation": "गंगा।"},
            {"id": 1, "text": "दूसरा प्रश्न?", "options": ["a", "b", "c", "d"], "correctIndex": 3, "explanation": ""}
        ]}"#;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "g-key"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate(quiz_json)))
            .mount(&server)
            .await;

        let source = GeminiSource::new("g-key", Some(server.uri()));
        let quiz = source
            .generate_quiz(&request(QuizInput::Topic("नदियाँ".into())))
            .await
            .unwrap();
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.questions[1].id, 2);
        assert_eq!(quiz.questions[1].correct_index, 3);
    }

    #[tokio::test]
    async fn missing_title_falls_back_to_input_label() {
        let server = MockServer::start().await;
        let quiz_json = r#"{"quizTitle": "", "questions": [
            {"text": "Q?", "options": ["a", "b", "c", "d"], "correctIndex": 0, "explanation": "e"}
        ]}"#;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate(quiz_json)))
            .mount(&server)
            .await;

        let source = GeminiSource::new("k", Some(server.uri()));
        let quiz = source
            .generate_quiz(&request(QuizInput::Text {
                text: "Some passage".into(),
                instructions: None,
            }))
            .await
            .unwrap();
        assert_eq!(quiz.title, "Pasted Text Content");
    }

    #[tokio::test]
    async fn rate_limit_carries_retry_after() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let source = GeminiSource::new("k", Some(server.uri()));
        let err = source
            .generate_quiz(&request(QuizInput::Topic("x".into())))
            .await
            .unwrap_err();
        let provider_err = err.downcast_ref::<ProviderError>().unwrap();
        assert_eq!(provider_err.retry_after_ms(), Some(7000));
    }

    #[tokio::test]
    async fn huge_retry_after_saturates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429).insert_header("retry-after", u64::MAX.to_string()),
            )
            .mount(&server)
            .await;

        let source = GeminiSource::new("k", Some(server.uri()));
        let err = source
            .generate_quiz(&request(QuizInput::Topic("x".into())))
            .await
            .unwrap_err();
        let provider_err = err.downcast_ref::<ProviderError>().unwrap();
        assert_eq!(provider_err.retry_after_ms(), Some(u64::MAX));
    }

    #[tokio::test]
    async fn unknown_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let source = GeminiSource::new("k", Some(server.uri()));
        let err = source
            .generate_quiz(&request(QuizInput::Topic("x".into())))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProviderError>(),
            Some(ProviderError::ModelNotFound(m)) if m == "gemini-2.5-flash"
        ));
    }

    #[tokio::test]
    async fn blocked_prompt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [],
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let source = GeminiSource::new("k", Some(server.uri()));
        let err = source
            .generate_quiz(&request(QuizInput::Topic("x".into())))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn generates_presentation() {
        let server = MockServer::start().await;
        let deck_json = r#"{"presentationTitle": "Photosynthesis", "slides": [
            {"slideNumber": 1, "slideTitle": "Photosynthesis", "slideType": "TitleSlide", "content": ["How plants eat"]},
            {"slideNumber": 2, "slideTitle": "Thanks", "slideType": "ThankYouSlide", "content": []}
        ]}"#;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate(deck_json)))
            .mount(&server)
            .await;

        let source = GeminiSource::new("k", Some(server.uri()));
        let deck = source
            .generate_presentation(&PresentationRequest {
                model: "gemini-2.5-flash".into(),
                input: QuizInput::Topic("Photosynthesis".into()),
                language: Language::English,
                temperature: 0.7,
            })
            .await
            .unwrap();
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[0].kind, SlideKind::TitleSlide);
    }
}
