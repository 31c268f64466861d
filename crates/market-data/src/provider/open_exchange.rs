//! exchangerate-api.com - keyless secondary FX source
//!
//! Quotes are "units of X per 1 THB". They are inverted to THB per unit and
//! a fixed bank-style spread is applied around the mid rate.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::Value;

use super::{QuoteProvider, read_json};
use crate::error::{MarketError, Result};
use crate::model::{CurrencyRate, Domain, ExchangeRateTable, MarketQuote, QuoteData, TRACKED_CURRENCIES};
use crate::normalize::{RATE_DECIMALS, decimal_from_json, non_empty, to_fixed};

const SOURCE_NAME: &str = "ExchangeRate-API";

const BUYING_SIGHT_SPREAD: Decimal = dec!(0.995);
const BUYING_TRANSFER_SPREAD: Decimal = dec!(0.998);
const SELLING_SPREAD: Decimal = dec!(1.005);

#[derive(Debug, Deserialize)]
pub struct OpenExchangePayload {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub rates: HashMap<String, Value>,
}

pub struct OpenExchangeRateProvider {
    client: reqwest::Client,
    base_url: String,
}

impl OpenExchangeRateProvider {
    pub const ID: &'static str = "exchangerate-api";

    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn normalize(payload: &OpenExchangePayload) -> Result<QuoteData> {
        let currencies: Vec<CurrencyRate> = TRACKED_CURRENCIES
            .iter()
            .filter_map(|(id, name_th, name_eng)| {
                let per_thb = payload.rates.get(*id).and_then(decimal_from_json)?;
                let mid = Decimal::ONE.checked_div(per_thb)?;

                Some(CurrencyRate {
                    currency_id: (*id).to_string(),
                    currency_name_th: (*name_th).to_string(),
                    currency_name_eng: (*name_eng).to_string(),
                    buying_sight: Some(to_fixed(mid.checked_mul(BUYING_SIGHT_SPREAD)?, RATE_DECIMALS)),
                    buying_transfer: Some(to_fixed(mid.checked_mul(BUYING_TRANSFER_SPREAD)?, RATE_DECIMALS)),
                    selling: Some(to_fixed(mid.checked_mul(SELLING_SPREAD)?, RATE_DECIMALS)),
                    mid_rate: Some(to_fixed(mid, RATE_DECIMALS)),
                })
            })
            .collect();

        if currencies.is_empty() {
            return Err(MarketError::NoData(Self::ID));
        }

        let period = payload
            .date
            .as_deref()
            .and_then(non_empty)
            .unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m-%d").to_string());

        Ok(QuoteData::ExchangeRate(ExchangeRateTable { period, currencies }))
    }
}

#[async_trait]
impl QuoteProvider for OpenExchangeRateProvider {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn domain(&self) -> Domain {
        Domain::ExchangeRate
    }

    async fn fetch(&self) -> Result<MarketQuote> {
        let url = format!("{}/v4/latest/THB", self.base_url);
        let payload: OpenExchangePayload = read_json(Self::ID, self.client.get(&url)).await?;

        if let Some(base) = payload.base.as_deref().filter(|b| *b != "THB") {
            return Err(MarketError::malformed(Self::ID, format!("unexpected base {base}")));
        }

        let data = Self::normalize(&payload)?;
        Ok(MarketQuote::new(Domain::ExchangeRate, Self::ID, SOURCE_NAME, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_inverts_and_spreads_rates() {
        let payload: OpenExchangePayload = serde_json::from_str(
            r#"{"base": "THB", "date": "2024-01-03", "rates": {"THB": 1, "USD": 0.025, "CHF": 0.03}}"#,
        )
        .unwrap();

        let data = OpenExchangeRateProvider::normalize(&payload).unwrap();
        let table = data.as_exchange_rate().unwrap();
        assert_eq!(table.period, "2024-01-03");
        assert_eq!(table.currencies.len(), 1);

        let usd = table.currency("USD").unwrap();
        assert_eq!(usd.mid_rate.unwrap().to_string(), "40.0000");
        assert_eq!(usd.buying_sight.unwrap().to_string(), "39.8000");
        assert_eq!(usd.buying_transfer.unwrap().to_string(), "39.9200");
        assert_eq!(usd.selling.unwrap().to_string(), "40.2000");
    }

    #[test]
    fn test_zero_rate_is_skipped() {
        let payload: OpenExchangePayload =
            serde_json::from_str(r#"{"rates": {"USD": 0, "EUR": 0.025}}"#).unwrap();

        let data = OpenExchangeRateProvider::normalize(&payload).unwrap();
        let table = data.as_exchange_rate().unwrap();
        assert!(table.currency("USD").is_none());
        assert!(table.currency("EUR").is_some());
    }

    #[tokio::test]
    async fn test_fetch_from_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/latest/THB"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"base": "THB", "date": "2024-01-03", "rates": {"USD": 0.0313}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenExchangeRateProvider::new(reqwest::Client::new(), server.uri());
        let quote = provider.fetch().await.unwrap();

        let usd = quote.data.as_exchange_rate().unwrap().currency("USD").unwrap().clone();
        assert_eq!(usd.mid_rate.unwrap().to_string(), "31.9489");
    }
}
