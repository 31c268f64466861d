//! Bank of Thailand - daily average exchange rates (primary FX source)
//!
//! The statistics gateway returns one row per currency per business day in
//! the requested window. Only the most recent period is kept.

use async_trait::async_trait;
use serde::Deserialize;

use super::bot::{BOT_SOURCE_NAME, BotEnvelope};
use super::{QuoteProvider, read_json};
use crate::error::{MarketError, Result};
use crate::model::{
    CurrencyRate, Domain, ExchangeRateTable, MarketQuote, PeriodRange, QuoteData, TRACKED_CURRENCIES,
};
use crate::normalize::{RATE_DECIMALS, fixed_decimal, latest_period, non_empty};

/// Days of history requested so weekends and holidays still yield a period
const WINDOW_DAYS: u64 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct BotExchangeDetail {
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub currency_id: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub currency_name_th: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub currency_name_eng: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub buying_sight: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub buying_transfer: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub selling: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub mid_rate: Option<String>,
}

impl BotExchangeDetail {
    fn has_mid_rate(&self) -> bool {
        self.mid_rate
            .as_deref()
            .and_then(|raw| fixed_decimal(raw, RATE_DECIMALS))
            .is_some()
    }
}

pub struct BotExchangeRateProvider {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BotExchangeRateProvider {
    pub const ID: &'static str = "bot-exchange-rate";

    pub fn new(client: reqwest::Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token,
        }
    }

    /// Keep the tracked currencies of the latest period, in display order
    pub fn normalize(details: &[BotExchangeDetail]) -> Result<QuoteData> {
        let period = latest_period(
            details
                .iter()
                .filter(|d| d.has_mid_rate())
                .filter_map(|d| d.period.as_deref()),
        )
        .ok_or(MarketError::NoData(Self::ID))?;

        let currencies: Vec<CurrencyRate> = TRACKED_CURRENCIES
            .iter()
            .filter_map(|(id, name_th, name_eng)| {
                let detail = details.iter().find(|d| {
                    d.period.as_deref().map(str::trim) == Some(period)
                        && d.currency_id.as_deref().map(str::trim) == Some(*id)
                })?;

                let rate = |raw: &Option<String>| {
                    raw.as_deref().and_then(|r| fixed_decimal(r, RATE_DECIMALS))
                };

                Some(CurrencyRate {
                    currency_id: (*id).to_string(),
                    currency_name_th: detail
                        .currency_name_th
                        .as_deref()
                        .and_then(non_empty)
                        .unwrap_or_else(|| (*name_th).to_string()),
                    currency_name_eng: detail
                        .currency_name_eng
                        .as_deref()
                        .and_then(non_empty)
                        .unwrap_or_else(|| (*name_eng).to_string()),
                    buying_sight: rate(&detail.buying_sight),
                    buying_transfer: rate(&detail.buying_transfer),
                    selling: rate(&detail.selling),
                    mid_rate: rate(&detail.mid_rate),
                })
            })
            .collect();

        if currencies.is_empty() {
            return Err(MarketError::NoData(Self::ID));
        }

        Ok(QuoteData::ExchangeRate(ExchangeRateTable {
            period: period.to_string(),
            currencies,
        }))
    }
}

#[async_trait]
impl QuoteProvider for BotExchangeRateProvider {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn domain(&self) -> Domain {
        Domain::ExchangeRate
    }

    fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    async fn fetch(&self) -> Result<MarketQuote> {
        let token = self
            .token
            .as_deref()
            .ok_or(MarketError::MissingCredential(Self::ID))?;

        let range = PeriodRange::trailing_days(WINDOW_DAYS);
        let url = format!("{}/Stat-ExchangeRate/v2/DAILY_AVG_EXG_RATE/", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[
                ("start_period", range.start_param()),
                ("end_period", range.end_param()),
            ])
            .header("Authorization", token)
            .header("Accept", "application/json");

        let envelope: BotEnvelope<BotExchangeDetail> = read_json(Self::ID, request).await?;
        let data = Self::normalize(&envelope.into_details())?;

        Ok(MarketQuote::new(Domain::ExchangeRate, Self::ID, BOT_SOURCE_NAME, data))
    }
}
