//! OpenRouter LLM Provider
//!
//! Implementation of `LlmProvider` over OpenRouter's OpenAI-compatible
//! chat-completions API.

use std::time::Duration;

use assistant_core::{
    error::{AssistantError, Result},
    message::ChatTurn,
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";
pub const APP_TITLE: &str = "Pawn AI Assistant";

/// OpenRouter provider configuration
#[derive(Clone, Debug)]
pub struct OpenRouterConfig {
    /// API key; the provider cannot be built without one
    pub api_key: Option<String>,

    /// API base URL
    pub base_url: String,

    /// Sent as `HTTP-Referer` for OpenRouter app attribution
    pub app_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            app_url: DEFAULT_APP_URL.into(),
            timeout_secs: 120,
        }
    }
}

impl OpenRouterConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let base_url = std::env::var("OPENROUTER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let app_url = std::env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.into());

        Self {
            api_key,
            base_url,
            app_url,
            ..Default::default()
        }
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    stop: &'a [String],
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
    #[serde(default)]
    error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Value,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(default)]
    message: String,
}

/// Flatten message content: a plain string, or an array of text parts
fn content_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(text) => Some(text.as_str()),
                Value::Object(obj) => obj.get("text").and_then(Value::as_str),
                _ => None,
            })
            .collect(),
        _ => String::new(),
    }
}

fn status_error(status: StatusCode, body: &str) -> AssistantError {
    let detail = serde_json::from_str::<ChatResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map_or_else(|| format!("HTTP {status}"), |e| format!("HTTP {status}: {}", e.message));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AssistantError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => AssistantError::RateLimited(detail),
        s if s.is_server_error() => AssistantError::ProviderUnavailable(detail),
        _ => AssistantError::Provider(detail),
    }
}

// ============================================================================
// Provider
// ============================================================================

/// OpenRouter LLM provider
pub struct OpenRouterProvider {
    client: reqwest::Client,
    config: OpenRouterConfig,
    api_key: String,
}

impl OpenRouterProvider {
    /// Create from configuration; fails without an API key
    pub fn from_config(config: OpenRouterConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AssistantError::Config("OPENROUTER_API_KEY is not configured".into()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AssistantError::Config(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenRouterConfig::from_env())
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.config.app_url)
            .header("X-Title", APP_TITLE)
    }

    fn convert_messages(messages: &[ChatTurn]) -> Vec<WireMessage<'_>> {
        messages
            .iter()
            .map(|m| WireMessage {
                role: match m.role {
                    assistant_core::Role::System => "system",
                    assistant_core::Role::User => "user",
                    assistant_core::Role::Assistant => "assistant",
                },
                content: &m.content,
            })
            .collect()
    }

    fn convert_completion(response: ChatResponse, requested_model: &str) -> Result<Completion> {
        if let Some(error) = response.error {
            return Err(AssistantError::Provider(error.message));
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::Parse("response has no choices".into()))?;

        Ok(Completion {
            content: choice
                .message
                .map(|m| content_text(&m.content))
                .unwrap_or_default(),
            model: response.model.unwrap_or_else(|| requested_model.to_string()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason.as_deref().map(FinishReason::parse),
        })
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "OpenRouter"
    }

    async fn health_check(&self) -> Result<bool> {
        let request = self.authorized(self.client.get(self.url("auth/key")));

        match request.send().await {
            Ok(response) if response.status().is_success() => Ok(true),
            Ok(response) => {
                tracing::warn!(status = %response.status(), "OpenRouter health check failed");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!("OpenRouter health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(&self, messages: &[ChatTurn], options: &GenerationOptions) -> Result<Completion> {
        let body = ChatRequest {
            model: &options.model,
            messages: Self::convert_messages(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: &options.stop_sequences,
        };

        tracing::debug!(model = %options.model, messages = messages.len(), "Sending chat completion");

        let response = self
            .authorized(self.client.post(self.url("chat/completions")))
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AssistantError::ProviderUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        Self::convert_completion(parsed, &options.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::ModelId;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenRouterProvider {
        OpenRouterProvider::from_config(OpenRouterConfig {
            api_key: Some("sk-or-test".into()),
            base_url: format!("{}/api/v1", server.uri()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        let err = OpenRouterProvider::from_config(OpenRouterConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, AssistantError::Config(_)));
    }

    #[test]
    fn test_content_parts_are_joined() {
        let parts = serde_json::json!([
            {"type": "text", "text": "ราคาทอง "},
            "วันนี้",
            {"type": "image_url", "image_url": {}}
        ]);
        assert_eq!(content_text(&parts), "ราคาทอง วันนี้");
        assert_eq!(content_text(&Value::Null), "");
    }

    #[tokio::test]
    async fn test_complete_sends_attribution_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-or-test"))
            .and(header("X-Title", "Pawn AI Assistant"))
            .and(header("HTTP-Referer", "http://localhost:3000"))
            .and(body_partial_json(serde_json::json!({
                "model": "anthropic/claude-sonnet-4",
                "max_tokens": 4096
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "gen-1",
                "model": "anthropic/claude-sonnet-4",
                "choices": [{
                    "message": {"role": "assistant", "content": "สวัสดีครับ"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = GenerationOptions::for_model(ModelId::Claude.model_name());
        let completion = provider(&server)
            .complete(&[ChatTurn::user("สวัสดี")], &options)
            .await
            .unwrap();

        assert_eq!(completion.content, "สวัสดีครับ");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 13);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(serde_json::json!({"error": {"message": "slow down"}})),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .complete(&[ChatTurn::user("hi")], &GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AssistantError::RateLimited(ref m) if m.contains("slow down")));
        assert_eq!(err.user_message(), assistant_core::RATE_LIMITED_NOTICE);
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = provider(&server)
            .complete(&[ChatTurn::user("hi")], &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/key"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        assert!(!provider(&server).health_check().await.unwrap());
    }
}
