//! pawn-server binary
//!
//! Loads `.env`, wires the market data feeds and the LLM provider, and
//! serves the dashboard API.

use std::sync::Arc;

use assistant_core::LlmProvider;
use assistant_runtime::{OpenRouterConfig, OpenRouterProvider};
use market_data::{MarketConfig, MarketData};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pawn_server::{AppState, ServerConfig, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_config = ServerConfig::from_env();

    // Market data feeds
    let market_config = MarketConfig::from_env();
    let credentials = market_config.credentials();
    let market = Arc::new(MarketData::new(market_config)?);

    for (name, present) in [
        ("BOT_API_TOKEN", credentials.bot_exchange_rate),
        ("BOT_INTEREST_RATE_TOKEN", credentials.bot_loan_rate),
        ("GOLD_API_TOKEN", credentials.gold_api),
        ("METAL_PRICE_API_KEY", credentials.metal_price),
        ("TAVILY_API_KEY", credentials.tavily),
    ] {
        if present {
            tracing::info!("✓ {} configured", name);
        } else {
            tracing::warn!("⚠ {} not set - serving secondary or estimated data", name);
        }
    }

    // LLM provider
    let llm: Option<Arc<dyn LlmProvider>> = match OpenRouterProvider::from_config(OpenRouterConfig::from_env()) {
        Ok(provider) => {
            if provider.health_check().await.unwrap_or(false) {
                tracing::info!("✓ Connected to OpenRouter");
            } else {
                tracing::warn!("⚠ OpenRouter not reachable - chat will answer with an apology");
            }
            Some(Arc::new(provider))
        }
        Err(e) => {
            tracing::warn!("⚠ {} - chat will return a configuration notice", e);
            tracing::warn!("  Set OPENROUTER_API_KEY in .env");
            None
        }
    };

    tracing::info!("Default model: {}", server_config.default_model.display_name());

    let state = AppState::new(market, llm, server_config.default_model);
    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 pawn-server running on http://{}", server_config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health             - Health check");
    tracing::info!("  GET  /api/gold-price     - Thai gold board price");
    tracing::info!("  GET  /api/gold-world     - XAU/USD spot price");
    tracing::info!("  GET  /api/exchange-rate  - THB exchange rates");
    tracing::info!("  GET  /api/loan-rate      - Bank loan rates");
    tracing::info!("  GET  /api/gold-estimate  - Thai gold estimate");
    tracing::info!("  GET  /api/chat           - List chat models");
    tracing::info!("  POST /api/chat           - Send message");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
