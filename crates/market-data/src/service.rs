//! Market Data Service
//!
//! Owns the shared HTTP client and one feed per domain. Everything here is
//! immutable after construction, so a single instance is shared behind an
//! `Arc` by every request.

use std::time::Duration;

use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::MarketConfig;
use crate::enrich::EnrichmentBlock;
use crate::error::Result;
use crate::estimate::{ThaiGoldEstimate, estimate_thai_gold};
use crate::fallback::{FALLBACK_SOURCE_NAME, fallback_loan_rates, fallback_quote};
use crate::feed::Feed;
use crate::model::{Domain, LoanRateKind, MarketQuote, PeriodRange, Provenance};
use crate::provider::{
    BotExchangeRateProvider, BotLoanRateProvider, GoldApiProvider, MetalPriceProvider,
    OpenExchangeRateProvider, TavilySearchProvider, ThaiGoldProvider,
};
use crate::router::Topic;

pub struct MarketData {
    config: MarketConfig,
    client: reqwest::Client,
    thai_gold: Feed,
    world_gold: Feed,
    exchange_rate: Feed,
    loan_rate: Feed,
    news: Feed,
    forecast: Feed,
}

impl MarketData {
    pub fn new(config: MarketConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("pawn-ai-analytics/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let thai_gold = Feed::new(ThaiGoldProvider::new(client.clone(), &config.thai_gold_url));

        let world_gold = Feed::new(GoldApiProvider::new(
            client.clone(),
            &config.gold_api_url,
            config.gold_api_token.clone(),
        ))
        .with_secondary(MetalPriceProvider::new(
            client.clone(),
            &config.metal_price_url,
            config.metal_price_api_key.clone(),
        ));

        let exchange_rate = Feed::new(BotExchangeRateProvider::new(
            client.clone(),
            &config.bot_url,
            config.bot_exchange_token.clone(),
        ))
        .with_secondary(OpenExchangeRateProvider::new(
            client.clone(),
            &config.open_exchange_url,
        ));

        let loan_rate = Feed::new(BotLoanRateProvider::new(
            client.clone(),
            &config.bot_url,
            config.bot_loan_rate_token.clone(),
        ));

        let news = Feed::new(TavilySearchProvider::news(
            client.clone(),
            &config.tavily_url,
            config.tavily_api_key.clone(),
        ));

        let forecast = Feed::new(TavilySearchProvider::forecast(
            client.clone(),
            &config.tavily_url,
            config.tavily_api_key.clone(),
        ));

        Ok(Self {
            config,
            client,
            thai_gold,
            world_gold,
            exchange_rate,
            loan_rate,
            news,
            forecast,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(MarketConfig::from_env())
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    fn feed(&self, domain: Domain) -> &Feed {
        match domain {
            Domain::ThaiGold => &self.thai_gold,
            Domain::WorldGold => &self.world_gold,
            Domain::ExchangeRate => &self.exchange_rate,
            Domain::LoanRate => &self.loan_rate,
            Domain::News => &self.news,
            Domain::Forecast => &self.forecast,
        }
    }

    /// Current quote for a domain; never fails
    pub async fn quote(&self, domain: Domain) -> MarketQuote {
        self.feed(domain).fetch_quote().await
    }

    /// Loan rates for an explicit kind and period window.
    /// `None` means the trailing 30 days.
    pub async fn loan_rates(&self, kind: LoanRateKind, range: Option<PeriodRange>) -> MarketQuote {
        let provider = BotLoanRateProvider::new(
            self.client.clone(),
            &self.config.bot_url,
            self.config.bot_loan_rate_token.clone(),
        )
        .with_kind(kind)
        .with_range(range);

        Feed::new(provider)
            .with_fallback(move || fallback_loan_rates(kind))
            .fetch_quote()
            .await
    }

    /// Quotes for one topic, in the topic's domain order
    pub async fn enrich(&self, topic: Topic) -> EnrichmentBlock {
        let quotes = join_all(topic.domains().iter().map(|domain| self.quote(*domain))).await;
        EnrichmentBlock::new(topic, quotes)
    }

    /// Blocks for several topics, fetched concurrently, output in input order
    pub async fn enrich_all(&self, topics: &[Topic]) -> Vec<EnrichmentBlock> {
        join_all(topics.iter().map(|topic| self.enrich(*topic))).await
    }

    /// Thai board price derived from world gold and USD/THB
    pub async fn gold_estimate(&self) -> GoldEstimateReport {
        let (world_gold, exchange_rate) = tokio::join!(
            self.quote(Domain::WorldGold),
            self.quote(Domain::ExchangeRate),
        );

        let world_price = world_gold
            .data
            .as_world_gold()
            .map(|gold| gold.price)
            .unwrap_or_else(|| fallback_price(Domain::WorldGold));

        let usd_mid = exchange_rate
            .data
            .as_exchange_rate()
            .and_then(|table| table.currency("USD"))
            .and_then(|usd| usd.mid_rate);

        // BOT may answer without a USD row; use the estimated rate then
        let (usd_thb, exchange_input) = match usd_mid {
            Some(rate) => (rate, EstimateInput::from(&exchange_rate)),
            None => (fallback_price(Domain::ExchangeRate), EstimateInput::fallback()),
        };

        if let Some(estimate) = estimate_thai_gold(world_price, usd_thb) {
            return GoldEstimateReport {
                estimate,
                world_gold: EstimateInput::from(&world_gold),
                exchange_rate: exchange_input,
            };
        }

        tracing::warn!(
            world_price = %world_price,
            usd_thb = %usd_thb,
            "Gold estimate overflowed, using fallback inputs"
        );

        GoldEstimateReport {
            estimate: estimate_thai_gold(
                fallback_price(Domain::WorldGold),
                fallback_price(Domain::ExchangeRate),
            )
            .unwrap_or_default(),
            world_gold: EstimateInput::fallback(),
            exchange_rate: EstimateInput::fallback(),
        }
    }
}

/// The figure the estimate needs from a fallback record
fn fallback_price(domain: Domain) -> Decimal {
    let quote = fallback_quote(domain);
    match domain {
        Domain::WorldGold => quote.data.as_world_gold().map(|g| g.price),
        _ => quote
            .data
            .as_exchange_rate()
            .and_then(|t| t.currency("USD"))
            .and_then(|usd| usd.mid_rate),
    }
    .unwrap_or_default()
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateInput {
    pub source_name: String,
    pub provenance: Provenance,
}

impl EstimateInput {
    fn fallback() -> Self {
        Self {
            source_name: FALLBACK_SOURCE_NAME.to_string(),
            provenance: Provenance::Fallback,
        }
    }
}

impl From<&MarketQuote> for EstimateInput {
    fn from(quote: &MarketQuote) -> Self {
        Self {
            source_name: quote.source_name.clone(),
            provenance: quote.provenance,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldEstimateReport {
    pub estimate: ThaiGoldEstimate,
    pub world_gold: EstimateInput,
    pub exchange_rate: EstimateInput,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn offline_config(server: &MockServer) -> MarketConfig {
        MarketConfig {
            gold_api_token: None,
            metal_price_api_key: None,
            ..Default::default()
        }
        .with_base_url(&server.uri())
    }

    #[tokio::test]
    async fn test_missing_token_serves_fallback_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/LoanRate/v2/avg_loan_rate/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let market = MarketData::new(offline_config(&server)).unwrap();
        let quote = market.quote(Domain::LoanRate).await;

        assert!(quote.is_estimated());
        assert_eq!(quote.data.as_loan_rate().unwrap().thai_commercial_banks[0].mor, Some(dec!(7.05)));
    }

    #[tokio::test]
    async fn test_exchange_secondary_when_bot_unconfigured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/latest/THB"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"base": "THB", "date": "2024-01-03", "rates": {"USD": 0.025}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let market = MarketData::new(offline_config(&server)).unwrap();
        let quote = market.quote(Domain::ExchangeRate).await;

        assert_eq!(quote.provenance, Provenance::Secondary);
        assert_eq!(quote.source_id, "exchangerate-api");
    }

    #[tokio::test]
    async fn test_loan_rates_fallback_keeps_kind() {
        let server = MockServer::start().await;
        let market = MarketData::new(offline_config(&server)).unwrap();

        let quote = market.loan_rates(LoanRateKind::Individual, None).await;
        assert!(quote.is_estimated());
        assert_eq!(quote.data.as_loan_rate().unwrap().kind, LoanRateKind::Individual);
    }

    #[tokio::test]
    async fn test_enrich_all_keeps_routed_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let market = MarketData::new(offline_config(&server)).unwrap();
        let blocks = market.enrich_all(&[Topic::LoanRate, Topic::Gold]).await;

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].topic, Topic::LoanRate);
        assert_eq!(blocks[1].quotes.len(), 2);
        assert_eq!(blocks[1].quotes[0].domain, Domain::ThaiGold);
        assert_eq!(blocks[1].quotes[1].domain, Domain::WorldGold);
        assert!(blocks.iter().all(EnrichmentBlock::has_estimates));
    }

    #[tokio::test]
    async fn test_gold_estimate_degrades_to_fallback_inputs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let market = MarketData::new(offline_config(&server)).unwrap();
        let report = market.gold_estimate().await;

        assert_eq!(report.world_gold.provenance, Provenance::Fallback);
        assert_eq!(report.exchange_rate.provenance, Provenance::Fallback);
        assert_eq!(report.estimate.bar_buy, dec!(39950));
    }

    #[tokio::test]
    async fn test_gold_estimate_overflow_uses_fallback_inputs() {
        let server = MockServer::start().await;
        // THB per USD of 1e28 after inversion
        Mock::given(method("GET"))
            .and(path("/v4/latest/THB"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"base": "THB", "date": "2024-01-03", "rates": {"USD": "0.0000000000000000000000000001"}}"#,
            ))
            .mount(&server)
            .await;

        let market = MarketData::new(offline_config(&server)).unwrap();
        assert_eq!(market.quote(Domain::ExchangeRate).await.provenance, Provenance::Secondary);

        let report = market.gold_estimate().await;

        assert_eq!(report.world_gold.provenance, Provenance::Fallback);
        assert_eq!(report.exchange_rate.provenance, Provenance::Fallback);
        assert_eq!(report.exchange_rate.source_name, "Estimated Data");
        assert_eq!(report.estimate.bar_buy, dec!(39950));
    }
}
