//! LLM Provider Strategy Pattern
//!
//! Common interface for hosted chat-completion backends, so the chat
//! handler works with any of them without code changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use assistant_core::provider::{GenerationOptions, LlmProvider};
//!
//! let provider = OpenRouterProvider::new(config)?;
//! let completion = provider.complete(&turns, &GenerationOptions::for_model(model)).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::ChatTurn;

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Provider model identifier (e.g., "anthropic/claude-sonnet-4")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling; provider default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Stop sequences
    #[serde(default)]
    pub stop_sequences: Vec<String>,
}

fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}

impl GenerationOptions {
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: crate::models::ModelId::default().model_name().into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: None,
            stop_sequences: Vec::new(),
        }
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

impl Completion {
    /// Whether the model produced no visible text
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn truncated(&self) -> bool {
        self.finish_reason == Some(FinishReason::Length)
    }
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Error,
}

impl FinishReason {
    /// Map an OpenAI-style `finish_reason` string
    pub fn parse(raw: &str) -> Self {
        match raw {
            "stop" | "end_turn" | "stop_sequence" => Self::Stop,
            "length" | "max_tokens" => Self::Length,
            "content_filter" => Self::ContentFilter,
            _ => Self::Error,
        }
    }
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends.
/// The chat handler works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logs and health output
    fn name(&self) -> &str;

    /// Check if the provider is reachable and the key is accepted
    async fn health_check(&self) -> Result<bool>;

    /// One request, one response. No streaming, no retry.
    async fn complete(&self, messages: &[ChatTurn], options: &GenerationOptions) -> Result<Completion>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert!((opts.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(opts.max_tokens, 4096);
        assert_eq!(opts.model, "anthropic/claude-sonnet-4");
    }

    #[test]
    fn test_for_model_keeps_defaults() {
        let opts = GenerationOptions::for_model("openai/gpt-4o");
        assert_eq!(opts.model, "openai/gpt-4o");
        assert_eq!(opts.max_tokens, 4096);
    }

    #[test]
    fn test_finish_reason_parse() {
        assert_eq!(FinishReason::parse("stop"), FinishReason::Stop);
        assert_eq!(FinishReason::parse("length"), FinishReason::Length);
        assert_eq!(FinishReason::parse("weird"), FinishReason::Error);
    }

    #[test]
    fn test_blank_completion() {
        let completion = Completion {
            content: "  \n".into(),
            model: "x".into(),
            usage: None,
            finish_reason: Some(FinishReason::Length),
        };
        assert!(completion.is_blank());
        assert!(completion.truncated());
    }
}
