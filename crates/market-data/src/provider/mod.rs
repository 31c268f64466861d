//! Market Data Providers
//!
//! One module per upstream API. Each provider owns a typed raw payload and a
//! pure `normalize` function that maps it onto [`QuoteData`].
//!
//! [`QuoteData`]: crate::model::QuoteData

mod bot;
mod bot_exchange;
mod bot_loan;
mod gold_api;
mod metal_price;
mod open_exchange;
mod tavily;
mod thai_gold;

pub use bot::{BotData, BotEnvelope, BotResult};
pub use bot_exchange::{BotExchangeDetail, BotExchangeRateProvider};
pub use bot_loan::{
    BotLoanRateDetail, BotLoanRateProvider, DEFAULT_WINDOW_DAYS as DEFAULT_LOAN_WINDOW_DAYS,
    FOREIGN_AVERAGE_NAME, FOREIGN_BANK_GROUP, THAI_AVERAGE_NAME, THAI_BANK_GROUP,
};
pub use gold_api::{GoldApiPayload, GoldApiProvider};
pub use metal_price::{MetalPricePayload, MetalPriceProvider};
pub use open_exchange::{OpenExchangePayload, OpenExchangeRateProvider};
pub use tavily::{FORECAST_QUERY, NEWS_QUERY, TavilyPayload, TavilySearchProvider};
pub use thai_gold::{GOLD_BAR_NAME, ORNAMENT_NAME, ThaiGoldPayload, ThaiGoldProvider};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::DeserializeOwned;

use crate::error::{MarketError, Result};
use crate::model::{Domain, MarketQuote};

/// Upstream data source (Strategy pattern)
///
/// Implement this for each API. Feeds only talk to this interface.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Stable identifier used in logs and quotes
    fn id(&self) -> &'static str;

    /// Domain this provider answers
    fn domain(&self) -> Domain;

    /// Whether the credential this provider needs is present.
    /// Unconfigured providers are skipped without a network call.
    fn is_configured(&self) -> bool {
        true
    }

    /// One request, normalized. No retries.
    async fn fetch(&self) -> Result<MarketQuote>;
}

/// Upper bound for a believable XAU/USD spot price
pub const MAX_USD_PER_OUNCE: Decimal = dec!(1000000);

/// Spot prices outside `(0, MAX_USD_PER_OUNCE)` mean a broken upstream
pub(crate) fn plausible_spot(price: Decimal) -> bool {
    price > Decimal::ZERO && price < MAX_USD_PER_OUNCE
}

/// Send a request and decode a JSON body; non-2xx is a failure
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(MarketError::Upstream {
            provider,
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        tracing::debug!(provider, error = %e, "Failed to decode provider payload");
        MarketError::malformed(provider, e.to_string())
    })
}
