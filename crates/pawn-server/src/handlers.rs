//! HTTP Handlers

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use assistant_core::{
    ChatTurn, ContextBlock, GenerationOptions, MISSING_KEY_NOTICE, ModelId, prompt::last_message,
};
use market_data::{
    Domain, LoanRateKind, PeriodRange, config::CredentialStatus, provider::DEFAULT_LOAN_WINDOW_DAYS,
    route,
};

use crate::state::AppState;

/// Shown when the LLM answers with no text
pub const EMPTY_REPLY: &str = "ขออภัยครับ ไม่สามารถประมวลผลได้ กรุณาลองใหม่อีกครั้ง";

// Cache-Control max-age per endpoint, in seconds
const GOLD_PRICE_MAX_AGE: u32 = 300;
const GOLD_WORLD_MAX_AGE: u32 = 60;
const EXCHANGE_RATE_MAX_AGE: u32 = 3600;
const LOAN_RATE_MAX_AGE: u32 = 3600;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub llm_configured: bool,
    pub llm_reachable: bool,
    pub credentials: CredentialStatus,
}

#[derive(Debug, Deserialize)]
pub struct LoanRateQuery {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub start_period: Option<NaiveDate>,
    #[serde(default)]
    pub end_period: Option<NaiveDate>,
}

impl LoanRateQuery {
    /// Anything other than `individual` means the averages
    fn kind(&self) -> LoanRateKind {
        match self.kind.as_deref().map(str::trim) {
            Some(k) if k.eq_ignore_ascii_case("individual") => LoanRateKind::Individual,
            _ => LoanRateKind::Average,
        }
    }

    fn range(&self) -> Option<PeriodRange> {
        match (self.start_period, self.end_period) {
            (Some(start), Some(end)) => Some(PeriodRange::new(start, end)),
            (None, Some(end)) => Some(PeriodRange::trailing(end, DEFAULT_LOAN_WINDOW_DAYS)),
            (Some(start), None) => Some(PeriodRange::new(start, chrono::Utc::now().date_naive())),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub role: &'static str,
    pub content: String,
    pub model: &'static str,
    pub model_name: &'static str,
}

impl ChatResponse {
    fn assistant(content: impl Into<String>, model: ModelId) -> Self {
        Self {
            role: "assistant",
            content: content.into(),
            model: model.as_str(),
            model_name: model.display_name(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub model_name: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsResponse {
    pub models: Vec<ModelEntry>,
    pub default_model: &'static str,
    pub has_api_key: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON body with a public `Cache-Control` hint
fn cached<T: Serialize>(max_age: u32, body: T) -> Response {
    let mut response = Json(body).into_response();
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={max_age}")) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let llm_reachable = match &state.llm {
        Some(llm) => llm.health_check().await.unwrap_or(false),
        None => false,
    };

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        llm_configured: state.llm.is_some(),
        llm_reachable,
        credentials: state.market.config().credentials(),
    })
}

/// Thai gold board price
pub async fn gold_price(State(state): State<AppState>) -> Response {
    cached(GOLD_PRICE_MAX_AGE, state.market.quote(Domain::ThaiGold).await)
}

/// XAU/USD spot price
pub async fn gold_world(State(state): State<AppState>) -> Response {
    cached(GOLD_WORLD_MAX_AGE, state.market.quote(Domain::WorldGold).await)
}

/// THB exchange rates
pub async fn exchange_rate(State(state): State<AppState>) -> Response {
    cached(EXCHANGE_RATE_MAX_AGE, state.market.quote(Domain::ExchangeRate).await)
}

/// Commercial bank loan rates; malformed dates are rejected with 400
pub async fn loan_rate(State(state): State<AppState>, Query(query): Query<LoanRateQuery>) -> Response {
    let quote = state.market.loan_rates(query.kind(), query.range()).await;
    cached(LOAN_RATE_MAX_AGE, quote)
}

/// Thai gold price derived from world gold and USD/THB
pub async fn gold_estimate(State(state): State<AppState>) -> Response {
    cached(GOLD_WORLD_MAX_AGE, state.market.gold_estimate().await)
}

/// Available chat models
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: ModelId::ALL
            .into_iter()
            .map(|id| ModelEntry {
                id: id.as_str(),
                name: id.display_name(),
                model_name: id.model_name(),
            })
            .collect(),
        default_model: state.default_model.as_str(),
        has_api_key: state.llm.is_some(),
    })
}

/// Chat endpoint: route keywords, enrich, compose, one LLM call.
///
/// Every outcome except a malformed body is a 200 with assistant content.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected chat body");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid messages format".into(),
            }),
        )
    })?;

    let model = ModelId::resolve(request.model.as_deref(), state.default_model);

    let Some(llm) = state.llm.clone() else {
        return Ok(Json(ChatResponse::assistant(MISSING_KEY_NOTICE, model)));
    };

    let question = last_message(&request.messages);
    let topics = route(question);
    tracing::info!(?topics, model = %model, "Routing chat request");

    let blocks: Vec<ContextBlock> = state
        .market
        .enrich_all(&topics)
        .await
        .into_iter()
        .map(|block| ContextBlock::new(block.label, block.render()))
        .collect();

    let prompt = state
        .composer
        .compose(state.system_prompt, &blocks, &request.messages);
    let options = GenerationOptions::for_model(model.model_name());

    let content = match llm.complete(&[ChatTurn::user(prompt)], &options).await {
        Ok(completion) if completion.is_blank() => {
            tracing::warn!(model = %model, "LLM returned empty content");
            EMPTY_REPLY.to_string()
        }
        Ok(completion) => {
            if completion.truncated() {
                tracing::debug!(model = %model, "LLM response truncated at max_tokens");
            }
            completion.content
        }
        Err(e) => {
            tracing::error!("LLM error: {}", e);
            e.user_message().to_string()
        }
    };

    Ok(Json(ChatResponse::assistant(content, model)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(raw: &str) -> LoanRateQuery {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_loan_query_kind_defaults_to_average() {
        assert_eq!(query("{}").kind(), LoanRateKind::Average);
        assert_eq!(query(r#"{"type": "bogus"}"#).kind(), LoanRateKind::Average);
        assert_eq!(query(r#"{"type": "individual"}"#).kind(), LoanRateKind::Individual);
    }

    #[test]
    fn test_loan_query_range() {
        assert!(query("{}").range().is_none());

        let range = query(r#"{"end_period": "2024-01-31"}"#).range().unwrap();
        assert_eq!(range.start_param(), "2024-01-01");

        let range = query(r#"{"start_period": "2024-01-01", "end_period": "2024-01-15"}"#)
            .range()
            .unwrap();
        assert_eq!(range.end_param(), "2024-01-15");
    }

    #[test]
    fn test_chat_response_shape() {
        let json = serde_json::to_value(ChatResponse::assistant("hi", ModelId::Grok)).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["model"], "grok");
        assert_eq!(json["modelName"], "Grok 3 Beta (xAI)");
    }
}
