//! metalpriceapi.com - secondary world gold source
//!
//! Quotes are "XAU per USD", so the spot price is the reciprocal.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::{QuoteProvider, plausible_spot, read_json};
use crate::error::{MarketError, Result};
use crate::model::{Domain, MarketQuote, QuoteData, WorldGoldPrice};
use crate::normalize::{decimal_from_json, to_fixed};

const SOURCE_NAME: &str = "MetalPriceAPI";

#[derive(Debug, Deserialize)]
pub struct MetalPricePayload {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub rates: HashMap<String, Value>,
}

pub struct MetalPriceProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl MetalPriceProvider {
    pub const ID: &'static str = "metalpriceapi";

    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Price only; this API has no change or range figures
    pub fn normalize(payload: &MetalPricePayload) -> Result<QuoteData> {
        if payload.success == Some(false) {
            return Err(MarketError::malformed(Self::ID, "success is false"));
        }

        let per_usd = payload
            .rates
            .get("XAU")
            .and_then(decimal_from_json)
            .ok_or_else(|| MarketError::malformed(Self::ID, "missing XAU rate"))?;

        let price = Decimal::ONE
            .checked_div(per_usd)
            .filter(|p| plausible_spot(*p))
            .ok_or_else(|| MarketError::malformed(Self::ID, format!("implausible XAU rate {per_usd}")))?;

        Ok(QuoteData::WorldGold(WorldGoldPrice {
            price: to_fixed(price, 2),
            change: None,
            change_percent: None,
            high_24h: None,
            low_24h: None,
            currency: "USD".into(),
        }))
    }
}

#[async_trait]
impl QuoteProvider for MetalPriceProvider {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn domain(&self) -> Domain {
        Domain::WorldGold
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch(&self) -> Result<MarketQuote> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(MarketError::MissingCredential(Self::ID))?;

        let url = format!("{}/v1/latest", self.base_url);
        let request = self.client.get(&url).query(&[
            ("api_key", api_key),
            ("base", "USD"),
            ("currencies", "XAU"),
        ]);

        let payload: MetalPricePayload = read_json(Self::ID, request).await?;
        let data = Self::normalize(&payload)?;

        Ok(MarketQuote::new(Domain::WorldGold, Self::ID, SOURCE_NAME, data))
    }
}
