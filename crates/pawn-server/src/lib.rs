//! pawn-server
//!
//! Axum service behind the pawn analytics dashboard: market data endpoints
//! and the enriched chat assistant.

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    chat_handler, exchange_rate, gold_estimate, gold_price, gold_world, health_check, list_models,
    loan_rate,
};

pub use config::ServerConfig;
pub use state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))

        // Market data
        .route("/api/gold-price", get(gold_price))
        .route("/api/gold-world", get(gold_world))
        .route("/api/exchange-rate", get(exchange_rate))
        .route("/api/loan-rate", get(loan_rate))
        .route("/api/gold-estimate", get(gold_estimate))

        // Assistant
        .route("/api/chat", get(list_models).post(chat_handler))

        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
