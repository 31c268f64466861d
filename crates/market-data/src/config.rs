//! Market Data Configuration
//!
//! Endpoints and credentials, loaded from the environment. A missing
//! credential is the only switch between the primary and fallback paths.

use serde::Serialize;

pub const DEFAULT_THAI_GOLD_URL: &str = "https://api.chnwt.dev";
pub const DEFAULT_GOLD_API_URL: &str = "https://www.goldapi.io";
pub const DEFAULT_METAL_PRICE_URL: &str = "https://api.metalpriceapi.com";
pub const DEFAULT_BOT_URL: &str = "https://gateway.api.bot.or.th";
pub const DEFAULT_OPEN_EXCHANGE_URL: &str = "https://api.exchangerate-api.com";
pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com";

/// Market data provider configuration
#[derive(Clone, Debug)]
pub struct MarketConfig {
    /// Thai gold board API base URL
    pub thai_gold_url: String,

    /// GoldAPI.io base URL and access token
    pub gold_api_url: String,
    pub gold_api_token: Option<String>,

    /// metalpriceapi.com base URL and key
    pub metal_price_url: String,
    pub metal_price_api_key: Option<String>,

    /// Bank of Thailand API gateway
    pub bot_url: String,
    pub bot_exchange_token: Option<String>,
    pub bot_loan_rate_token: Option<String>,

    /// Keyless FX API used when the BOT gateway is unavailable
    pub open_exchange_url: String,

    /// Tavily web search
    pub tavily_url: String,
    pub tavily_api_key: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            thai_gold_url: DEFAULT_THAI_GOLD_URL.into(),
            gold_api_url: DEFAULT_GOLD_API_URL.into(),
            gold_api_token: Some("goldapi-demo".into()),
            metal_price_url: DEFAULT_METAL_PRICE_URL.into(),
            metal_price_api_key: Some("demo".into()),
            bot_url: DEFAULT_BOT_URL.into(),
            bot_exchange_token: None,
            bot_loan_rate_token: None,
            open_exchange_url: DEFAULT_OPEN_EXCHANGE_URL.into(),
            tavily_url: DEFAULT_TAVILY_URL.into(),
            tavily_api_key: None,
            timeout_secs: 10,
        }
    }
}

impl MarketConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            thai_gold_url: env_or("THAI_GOLD_BASE_URL", defaults.thai_gold_url),
            gold_api_url: env_or("GOLD_API_BASE_URL", defaults.gold_api_url),
            gold_api_token: env_opt("GOLD_API_TOKEN").or(defaults.gold_api_token),
            metal_price_url: env_or("METAL_PRICE_BASE_URL", defaults.metal_price_url),
            metal_price_api_key: env_opt("METAL_PRICE_API_KEY").or(defaults.metal_price_api_key),
            bot_url: env_or("BOT_BASE_URL", defaults.bot_url),
            bot_exchange_token: env_opt("BOT_API_TOKEN"),
            bot_loan_rate_token: env_opt("BOT_INTEREST_RATE_TOKEN"),
            open_exchange_url: env_or("OPEN_EXCHANGE_BASE_URL", defaults.open_exchange_url),
            tavily_url: env_or("TAVILY_BASE_URL", defaults.tavily_url),
            tavily_api_key: env_opt("TAVILY_API_KEY"),
            timeout_secs: std::env::var("MARKET_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Point every provider at one host, keeping credentials as they are.
    /// Used to run against a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        self.thai_gold_url.clone_from(&base);
        self.gold_api_url.clone_from(&base);
        self.metal_price_url.clone_from(&base);
        self.bot_url.clone_from(&base);
        self.open_exchange_url.clone_from(&base);
        self.tavily_url = base;
        self
    }

    /// Which credentials are present (never the values)
    pub fn credentials(&self) -> CredentialStatus {
        CredentialStatus {
            bot_exchange_rate: self.bot_exchange_token.is_some(),
            bot_loan_rate: self.bot_loan_rate_token.is_some(),
            gold_api: self.gold_api_token.is_some(),
            metal_price: self.metal_price_api_key.is_some(),
            tavily: self.tavily_api_key.is_some(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CredentialStatus {
    pub bot_exchange_rate: bool,
    pub bot_loan_rate: bool,
    pub gold_api: bool,
    pub metal_price: bool,
    pub tavily: bool,
}

fn env_or(key: &str, default: String) -> String {
    env_opt(key).unwrap_or(default)
}

/// Unset and blank variables both count as absent
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
