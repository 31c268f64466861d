//! # assistant-runtime
//!
//! Hosted LLM providers for the pawn chat assistant.
//!
//! ## Providers
//!
//! - **OpenRouter** (default): OpenAI-compatible chat completions, which
//!   fronts the GPT, Claude and Grok models in the registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use assistant_runtime::openrouter::OpenRouterProvider;
//!
//! let provider = OpenRouterProvider::from_env()?;
//! let completion = provider.complete(&turns, &options).await?;
//! ```

#[cfg(feature = "openrouter")]
pub mod openrouter;

#[cfg(feature = "openrouter")]
pub use openrouter::{OpenRouterConfig, OpenRouterProvider};

// Re-export core types for convenience
pub use assistant_core::{
    AssistantError, ChatTurn, Completion, GenerationOptions, LlmProvider, ModelId, Result, Role,
};
