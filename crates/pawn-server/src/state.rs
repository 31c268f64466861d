//! Application State

use std::sync::Arc;

use assistant_core::{LlmProvider, ModelId, PromptComposer};
use market_data::MarketData;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Market data feeds and the shared HTTP client
    pub market: Arc<MarketData>,

    /// LLM provider (None when OPENROUTER_API_KEY is not set)
    pub llm: Option<Arc<dyn LlmProvider>>,

    /// Builds the prompt from enrichment blocks and history
    pub composer: PromptComposer,

    /// Model for requests that name none or an unknown one
    pub default_model: ModelId,

    /// System prompt placed at the top of every chat prompt
    pub system_prompt: &'static str,
}

impl AppState {
    pub fn new(market: Arc<MarketData>, llm: Option<Arc<dyn LlmProvider>>, default_model: ModelId) -> Self {
        Self {
            market,
            llm,
            composer: PromptComposer::default(),
            default_model,
            system_prompt: market_data::PAWN_ASSISTANT_PROMPT,
        }
    }
}
