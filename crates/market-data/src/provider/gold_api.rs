//! GoldAPI.io - XAU/USD spot price (primary world gold source)

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{QuoteProvider, plausible_spot, read_json};
use crate::error::{MarketError, Result};
use crate::model::{Domain, MarketQuote, QuoteData, WorldGoldPrice};
use crate::normalize::{decimal_from_json, to_fixed};

const SOURCE_NAME: &str = "GoldAPI.io";

/// Raw `/api/XAU/USD` body. Fields are kept as JSON values because the API
/// returns numbers but the demo token sometimes returns strings.
#[derive(Debug, Deserialize)]
pub struct GoldApiPayload {
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub ch: Value,
    #[serde(default)]
    pub chp: Value,
    #[serde(default)]
    pub high_price: Value,
    #[serde(default)]
    pub low_price: Value,
}

pub struct GoldApiProvider {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GoldApiProvider {
    pub const ID: &'static str = "goldapi";

    pub fn new(client: reqwest::Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token,
        }
    }

    pub fn normalize(payload: &GoldApiPayload) -> Result<QuoteData> {
        let price = decimal_from_json(&payload.price)
            .ok_or_else(|| MarketError::malformed(Self::ID, "missing price"))?;
        if !plausible_spot(price) {
            return Err(MarketError::malformed(Self::ID, format!("implausible price {price}")));
        }

        let two_dp = |value: &Value| decimal_from_json(value).map(|d| to_fixed(d, 2));

        Ok(QuoteData::WorldGold(WorldGoldPrice {
            price: to_fixed(price, 2),
            change: two_dp(&payload.ch),
            change_percent: two_dp(&payload.chp),
            high_24h: two_dp(&payload.high_price),
            low_24h: two_dp(&payload.low_price),
            currency: "USD".into(),
        }))
    }
}

#[async_trait]
impl QuoteProvider for GoldApiProvider {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn domain(&self) -> Domain {
        Domain::WorldGold
    }

    fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    async fn fetch(&self) -> Result<MarketQuote> {
        let token = self
            .token
            .as_deref()
            .ok_or(MarketError::MissingCredential(Self::ID))?;

        let url = format!("{}/api/XAU/USD", self.base_url);
        let request = self
            .client
            .get(&url)
            .header("x-access-token", token)
            .header("Content-Type", "application/json");

        let payload: GoldApiPayload = read_json(Self::ID, request).await?;
        let data = Self::normalize(&payload)?;

        Ok(MarketQuote::new(Domain::WorldGold, Self::ID, SOURCE_NAME, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_normalize_numbers_and_strings() {
        let payload: GoldApiPayload = serde_json::from_str(
            r#"{"price": 2650.456, "ch": "-3.1", "chp": -0.12, "high_price": 2661, "low_price": null}"#,
        )
        .unwrap();

        let data = GoldApiProvider::normalize(&payload).unwrap();
        let gold = data.as_world_gold().unwrap();
        assert_eq!(gold.price, dec!(2650.46));
        assert_eq!(gold.change, Some(dec!(-3.10)));
        assert_eq!(gold.change_percent, Some(dec!(-0.12)));
        assert_eq!(gold.high_24h, Some(dec!(2661.00)));
        assert_eq!(gold.low_24h, None);
    }

    #[test]
    fn test_missing_price_is_failure() {
        let payload: GoldApiPayload = serde_json::from_str(r#"{"error": "quota"}"#).unwrap();
        assert!(GoldApiProvider::normalize(&payload).is_err());
    }

    #[test]
    fn test_implausible_price_is_failure() {
        for body in [r#"{"price": 0}"#, r#"{"price": -5}"#, r#"{"price": 1e28}"#, r#"{"price": 1000000}"#] {
            let payload: GoldApiPayload = serde_json::from_str(body).unwrap();
            assert!(GoldApiProvider::normalize(&payload).is_err(), "{body}");
        }
    }

    #[tokio::test]
    async fn test_absurd_price_degrades_to_secondary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/XAU/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"price": 1e28})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/latest"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"success": true, "rates": {"XAU": 0.0004}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let market = crate::MarketData::new(
            crate::MarketConfig::default().with_base_url(&server.uri()),
        )
        .unwrap();
        let quote = market.quote(Domain::WorldGold).await;

        assert_eq!(quote.provenance, crate::Provenance::Secondary);
        assert_eq!(quote.data.as_world_gold().unwrap().price, dec!(2500.00));
    }

    #[tokio::test]
    async fn test_fetch_sends_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/XAU/USD"))
            .and(header("x-access-token", "goldapi-demo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "price": 2644.58, "ch": -2.46, "chp": -0.09,
                "high_price": 2659.58, "low_price": 2632.58
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            GoldApiProvider::new(reqwest::Client::new(), server.uri(), Some("goldapi-demo".into()));
        let quote = provider.fetch().await.unwrap();

        assert_eq!(quote.data.as_world_gold().unwrap().price, dec!(2644.58));
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = GoldApiProvider::new(reqwest::Client::new(), server.uri(), None);
        assert!(!provider.is_configured());

        let err = provider.fetch().await.unwrap_err();
        assert!(err.is_missing_credential());
    }
}
