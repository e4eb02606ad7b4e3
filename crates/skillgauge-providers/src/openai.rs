//! OpenAI question source.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use skillgauge_core::error::SourceError;
use skillgauge_core::model::Question;
use skillgauge_core::source::{
    build_prompt, normalize_questions, parse_questions_text, GenerateRequest, QuestionSource,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const SYSTEM_PROMPT: &str = "You are an expert technical interviewer who creates high-quality assessment questions. Respond ONLY with valid JSON.";

/// OpenAI-compatible chat-completions question source.
pub struct OpenAiSource {
    api_key: String,
    base_url: String,
    model: String,
    org_id: Option<String>,
    client: reqwest::Client,
}

impl OpenAiSource {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        model: Option<String>,
        org_id: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            org_id,
            client,
        }
    }
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    temperature: f64,
    messages: Vec<OpenAiMessage>,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Deserialize)]
struct OpenAiChoiceMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl QuestionSource for OpenAiSource {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %self.model, role = %request.role))]
    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<Question>, SourceError> {
        let body = OpenAiRequest {
            model: self.model.clone(),
            temperature: 0.7,
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: build_prompt(request),
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

        let response = req.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else {
                SourceError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(SourceError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::AuthenticationFailed(body));
        }
        if status == 404 {
            return Err(SourceError::ModelNotFound(self.model.clone()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError {
                status,
                message: body,
            });
        }

        let api_response: OpenAiResponse =
            response.json().await.map_err(|e| SourceError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        let text = api_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(SourceError::EmptyResponse("openai".into()));
        }

        let raw = parse_questions_text(&text)?;
        let questions = normalize_questions(raw, request);
        if questions.is_empty() {
            return Err(SourceError::MalformedResponse(
                "reply contained no usable questions".into(),
            ));
        }
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerateRequest {
        GenerateRequest {
            role: "Backend Developer".into(),
            skills: vec!["SQL".into()],
            count: 1,
            difficulty: None,
            context: None,
        }
    }

    fn reply_with(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"content": content, "role": "assistant"}, "index": 0}],
            "model": "gpt-4o-mini"
        })
    }

    #[tokio::test]
    async fn successful_generation() {
        let server = MockServer::start().await;

        let content = r#"[{"question": "Which clause filters grouped rows?", "options": ["WHERE", "HAVING", "ORDER BY", "LIMIT"], "correctAnswer": 1, "category": "SQL", "concept": "aggregation"}]"#;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_with(content)))
            .mount(&server)
            .await;

        let source = OpenAiSource::new("test-key", Some(server.uri()), None, None);
        let questions = source.generate(&request()).await.unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].concept, "aggregation");
    }

    #[tokio::test]
    async fn authentication_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let source = OpenAiSource::new("bad-key", Some(server.uri()), None, None);
        let err = source.generate(&request()).await.unwrap_err();
        assert!(matches!(err, SourceError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn forbidden_is_authentication_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(403).set_body_string("key lacks access"))
            .mount(&server)
            .await;

        let source = OpenAiSource::new("restricted-key", Some(server.uri()), None, None);
        let err = source.generate(&request()).await.unwrap_err();
        assert!(matches!(err, SourceError::AuthenticationFailed(_)));
        assert!(err.is_permanent());
    }

    #[tokio::test]
    async fn server_error_maps_to_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let source = OpenAiSource::new("test-key", Some(server.uri()), None, None);
        let err = source.generate(&request()).await.unwrap_err();
        assert!(matches!(err, SourceError::ApiError { status: 500, .. }));
    }

    #[tokio::test]
    async fn custom_model_appears_in_request_path_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such model"))
            .mount(&server)
            .await;

        let source = OpenAiSource::new(
            "test-key",
            Some(server.uri()),
            Some("gpt-unreal".into()),
            None,
        );
        let err = source.generate(&request()).await.unwrap_err();
        assert!(matches!(err, SourceError::ModelNotFound(m) if m == "gpt-unreal"));
    }
}
