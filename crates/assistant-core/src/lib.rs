//! # assistant-core
//!
//! Provider-agnostic pieces of the pawn chat assistant.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        Chat request                           │
//! │  ┌─────────────┐   ┌────────────────┐   ┌──────────────────┐  │
//! │  │ ModelId     │   │ PromptComposer │──▶│   LlmProvider    │  │
//! │  │ registry    │──▶│ (blocks+turns) │   │   (Strategy)     │  │
//! │  └─────────────┘   └────────────────┘   └──────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait keeps the server independent of the hosted
//! chat-completion backend. Conversations are never stored: the client
//! resends the full turn list on every request.

pub mod error;
pub mod message;
pub mod models;
pub mod prompt;
pub mod provider;

pub use error::{APOLOGY, AssistantError, MISSING_KEY_NOTICE, RATE_LIMITED_NOTICE, Result};
pub use message::{ChatTurn, Role};
pub use models::{DEFAULT_MODEL, ModelId};
pub use prompt::{ContextBlock, PromptComposer};
pub use provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage};
