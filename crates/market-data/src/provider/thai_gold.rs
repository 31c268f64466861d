//! Thai Gold Board Price
//!
//! Gold Traders Association prices via the public `thai-gold-api`.

use async_trait::async_trait;
use serde::Deserialize;

use super::{QuoteProvider, read_json};
use crate::error::{MarketError, Result};
use crate::model::{Domain, GoldPriceBoard, GoldPriceChange, GoldPriceEntry, MarketQuote, QuoteData};
use crate::normalize::non_empty;

pub const GOLD_BAR_NAME: &str = "ทองคำแท่ง 96.5%";
pub const ORNAMENT_NAME: &str = "ทองรูปพรรณ 96.5%";

const SOURCE_NAME: &str = "สมาคมค้าทองคำ (Thai Gold API)";

#[derive(Debug, Deserialize)]
pub struct ThaiGoldPayload {
    #[serde(default)]
    pub status: String,
    pub response: Option<ThaiGoldResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ThaiGoldResponse {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub update_time: String,
    pub price: ThaiGoldPriceSet,
}

#[derive(Debug, Deserialize)]
pub struct ThaiGoldPriceSet {
    pub gold: BuySell,
    pub gold_bar: BuySell,
    pub change: Option<ChangeSet>,
}

#[derive(Debug, Deserialize)]
pub struct BuySell {
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub buy: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub sell: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeSet {
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub compare_previous: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub compare_yesterday: Option<String>,
}

/// Thai gold board price provider (keyless)
pub struct ThaiGoldProvider {
    client: reqwest::Client,
    base_url: String,
}

impl ThaiGoldProvider {
    pub const ID: &'static str = "thai-gold-api";

    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Map the board payload; anything but `status: success` is a failure
    pub fn normalize(payload: &ThaiGoldPayload) -> Result<QuoteData> {
        if payload.status != "success" {
            return Err(MarketError::malformed(
                Self::ID,
                format!("status is '{}'", payload.status),
            ));
        }

        let response = payload
            .response
            .as_ref()
            .ok_or_else(|| MarketError::malformed(Self::ID, "missing response"))?;
        let price = &response.price;

        let entry = |name: &str, pair: &BuySell| GoldPriceEntry {
            name: name.to_string(),
            buy: pair.buy.as_deref().and_then(non_empty),
            sell: pair.sell.as_deref().and_then(non_empty),
        };

        let change = price
            .change
            .as_ref()
            .map(|c| GoldPriceChange {
                compare_previous: c.compare_previous.as_deref().and_then(non_empty),
                compare_yesterday: c.compare_yesterday.as_deref().and_then(non_empty),
            })
            .unwrap_or_default();

        Ok(QuoteData::ThaiGold(GoldPriceBoard {
            date: response.date.trim().to_string(),
            update_time: response.update_time.trim().to_string(),
            prices: vec![
                entry(GOLD_BAR_NAME, &price.gold_bar),
                entry(ORNAMENT_NAME, &price.gold),
            ],
            change,
        }))
    }
}

#[async_trait]
impl QuoteProvider for ThaiGoldProvider {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn domain(&self) -> Domain {
        Domain::ThaiGold
    }

    async fn fetch(&self) -> Result<MarketQuote> {
        let url = format!("{}/thai-gold-api/latest", self.base_url);
        let payload: ThaiGoldPayload = read_json(Self::ID, self.client.get(&url)).await?;
        let data = Self::normalize(&payload)?;

        Ok(MarketQuote::new(Domain::ThaiGold, Self::ID, SOURCE_NAME, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_JSON: &str = r#"{
        "status": "success",
        "response": {
            "date": "19 ตุลาคม 2569",
            "update_time": "เวลา 09:30 น. (ครั้งที่ 1)",
            "price": {
                "gold": { "buy": "42,650.00", "sell": "43,750.00" },
                "gold_bar": { "buy": "43,150.00", "sell": "43,250.00" },
                "change": { "compare_previous": "+50", "compare_yesterday": "-100" }
            }
        }
    }"#;

    #[test]
    fn test_normalize_orders_bar_before_ornament() {
        let payload: ThaiGoldPayload = serde_json::from_str(MOCK_JSON).unwrap();
        let QuoteData::ThaiGold(board) = ThaiGoldProvider::normalize(&payload).unwrap() else {
            panic!("expected thai gold data");
        };

        assert_eq!(board.prices[0].name, GOLD_BAR_NAME);
        assert_eq!(board.prices[0].buy.as_deref(), Some("43,150.00"));
        assert_eq!(board.prices[1].name, ORNAMENT_NAME);
        assert_eq!(board.prices[1].sell.as_deref(), Some("43,750.00"));
        assert_eq!(board.change.compare_yesterday.as_deref(), Some("-100"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let payload: ThaiGoldPayload = serde_json::from_str(MOCK_JSON).unwrap();
        let first = ThaiGoldProvider::normalize(&payload).unwrap();
        let second = ThaiGoldProvider::normalize(&payload).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_success_status_is_failure() {
        let payload: ThaiGoldPayload =
            serde_json::from_str(r#"{"status": "error", "response": null}"#).unwrap();
        assert!(ThaiGoldProvider::normalize(&payload).is_err());
    }

    #[tokio::test]
    async fn test_fetch_from_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thai-gold-api/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MOCK_JSON))
            .expect(1)
            .mount(&server)
            .await;

        let provider = ThaiGoldProvider::new(reqwest::Client::new(), server.uri());
        let quote = provider.fetch().await.unwrap();

        assert_eq!(quote.domain, Domain::ThaiGold);
        assert_eq!(quote.source_id, ThaiGoldProvider::ID);
        assert!(!quote.is_estimated());
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = ThaiGoldProvider::new(reqwest::Client::new(), server.uri());
        let err = provider.fetch().await.unwrap_err();
        assert!(matches!(err, MarketError::Upstream { status: 503, .. }));
    }
}
