//! Tavily web search - gold news and outlook
//!
//! One provider instance per domain; the query is fixed at construction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{QuoteProvider, read_json};
use crate::error::{MarketError, Result};
use crate::model::{Domain, MarketQuote, QuoteData, SearchDigest, SearchHit};
use crate::normalize::non_empty;

pub const NEWS_QUERY: &str = "ข่าวราคาทองคำ ตลาดทอง ไทย วันนี้";
pub const FORECAST_QUERY: &str = "gold price forecast analysis prediction";

const MAX_RESULTS: u8 = 5;
const SNIPPET_CHARS: usize = 400;
const SOURCE_NAME: &str = "Tavily Search";

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    topic: &'a str,
    max_results: u8,
}

#[derive(Debug, Deserialize)]
pub struct TavilyPayload {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
pub struct TavilyResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

pub struct TavilySearchProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    domain: Domain,
    query: &'static str,
}

impl TavilySearchProvider {
    pub const ID: &'static str = "tavily";

    pub fn news(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
            domain: Domain::News,
            query: NEWS_QUERY,
        }
    }

    pub fn forecast(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
            domain: Domain::Forecast,
            query: FORECAST_QUERY,
        }
    }

    /// Keep hits with a URL, trimming long page extracts
    pub fn normalize(query: &str, payload: &TavilyPayload) -> QuoteData {
        let hits = payload
            .results
            .iter()
            .filter(|r| !r.url.trim().is_empty())
            .take(usize::from(MAX_RESULTS))
            .map(|r| SearchHit {
                title: r.title.trim().to_string(),
                url: r.url.trim().to_string(),
                snippet: r.content.trim().chars().take(SNIPPET_CHARS).collect(),
            })
            .collect();

        QuoteData::Search(SearchDigest {
            query: payload
                .query
                .as_deref()
                .and_then(non_empty)
                .unwrap_or_else(|| query.to_string()),
            hits,
            note: None,
        })
    }
}

#[async_trait]
impl QuoteProvider for TavilySearchProvider {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn domain(&self) -> Domain {
        self.domain
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch(&self) -> Result<MarketQuote> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(MarketError::MissingCredential(Self::ID))?;

        let url = format!("{}/search", self.base_url);
        let request = self.client.post(&url).bearer_auth(api_key).json(&SearchRequest {
            query: self.query,
            topic: "news",
            max_results: MAX_RESULTS,
        });

        let payload: TavilyPayload = read_json(Self::ID, request).await?;
        let data = Self::normalize(self.query, &payload);

        Ok(MarketQuote::new(self.domain, Self::ID, SOURCE_NAME, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_normalize_drops_hits_without_url() {
        let payload: TavilyPayload = serde_json::from_str(
            r#"{"results": [
                {"title": " Gold rallies ", "url": "https://example.com/a", "content": "Spot gold rose."},
                {"title": "No link", "url": "", "content": "x"}
            ]}"#,
        )
        .unwrap();

        let QuoteData::Search(digest) = TavilySearchProvider::normalize(NEWS_QUERY, &payload) else {
            panic!("expected search digest");
        };
        assert_eq!(digest.query, NEWS_QUERY);
        assert_eq!(digest.hits.len(), 1);
        assert_eq!(digest.hits[0].title, "Gold rallies");
    }

    #[tokio::test]
    async fn test_forecast_posts_fixed_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("Authorization", "Bearer tvly-test"))
            .and(body_partial_json(serde_json::json!({
                "query": FORECAST_QUERY,
                "max_results": 5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": FORECAST_QUERY,
                "results": [{"title": "Outlook", "url": "https://example.com/o", "content": "Bullish"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            TavilySearchProvider::forecast(reqwest::Client::new(), server.uri(), Some("tvly-test".into()));
        let quote = provider.fetch().await.unwrap();

        assert_eq!(quote.domain, Domain::Forecast);
        let QuoteData::Search(digest) = quote.data else {
            panic!("expected search digest");
        };
        assert_eq!(digest.hits[0].snippet, "Bullish");
    }
}
