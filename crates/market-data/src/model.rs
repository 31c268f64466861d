//! Domain Models
//!
//! Normalized market data shapes shared by every provider.
//! Uses `rust_decimal` for prices and rates - never use f64 for money!

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currencies shown on the exchange-rate widget, in display order.
///
/// `(currency id, Thai name, English name)`
pub const TRACKED_CURRENCIES: [(&str, &str, &str); 8] = [
    ("USD", "สหรัฐอเมริกา : ดอลลาร์ (USD)", "USA : DOLLAR (USD)"),
    ("EUR", "สหภาพยุโรป : ยูโร (EUR)", "Euro Zone : EURO (EUR)"),
    ("GBP", "สหราชอาณาจักร : ปอนด์ (GBP)", "UK : POUND (GBP)"),
    ("JPY", "ญี่ปุ่น : เยน (JPY)", "Japan : YEN (JPY)"),
    ("CNY", "จีน : หยวน (CNY)", "China : YUAN (CNY)"),
    ("SGD", "สิงคโปร์ : ดอลลาร์ (SGD)", "Singapore : DOLLAR (SGD)"),
    ("AUD", "ออสเตรเลีย : ดอลลาร์ (AUD)", "Australia : DOLLAR (AUD)"),
    ("HKD", "ฮ่องกง : ดอลลาร์ (HKD)", "Hong Kong : DOLLAR (HKD)"),
];

/// A data domain served by one feed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Domestic gold bar / ornament board price
    ThaiGold,
    /// XAU/USD spot price
    WorldGold,
    /// THB exchange rates
    ExchangeRate,
    /// Commercial bank loan rates (MOR/MLR/MRR)
    LoanRate,
    /// Gold market news search
    News,
    /// Gold price outlook search
    Forecast,
}

impl Domain {
    pub const ALL: [Self; 6] = [
        Self::ThaiGold,
        Self::WorldGold,
        Self::ExchangeRate,
        Self::LoanRate,
        Self::News,
        Self::Forecast,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ThaiGold => "thai_gold",
            Self::WorldGold => "world_gold",
            Self::ExchangeRate => "exchange_rate",
            Self::LoanRate => "loan_rate",
            Self::News => "news",
            Self::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a quote came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Primary provider
    Live,
    /// Backup provider, still live data
    Secondary,
    /// Static estimate; not live
    Fallback,
}

impl Provenance {
    pub fn is_estimated(self) -> bool {
        matches!(self, Self::Fallback)
    }

    /// Thai label used when the quote is embedded in a prompt
    pub fn label_th(self) -> &'static str {
        match self {
            Self::Live => "ข้อมูลสด",
            Self::Secondary => "ข้อมูลสดจากแหล่งสำรอง",
            Self::Fallback => "ข้อมูลประมาณการ (ไม่ใช่ข้อมูลสด)",
        }
    }
}

/// One normalized reading from an external source
///
/// Built fresh on every request and discarded after it is rendered.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketQuote {
    /// Domain this quote answers
    pub domain: Domain,

    /// Stable provider identifier (e.g. "bot-exchange-rate")
    pub source_id: String,

    /// Human-readable provider name
    pub source_name: String,

    /// Live, secondary or fallback
    pub provenance: Provenance,

    /// When the quote was constructed
    pub as_of: DateTime<Utc>,

    /// Typed payload; the key set is fixed per domain
    pub data: QuoteData,
}

impl MarketQuote {
    pub fn new(
        domain: Domain,
        source_id: impl Into<String>,
        source_name: impl Into<String>,
        data: QuoteData,
    ) -> Self {
        Self {
            domain,
            source_id: source_id.into(),
            source_name: source_name.into(),
            provenance: Provenance::Live,
            as_of: Utc::now(),
            data,
        }
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn is_estimated(&self) -> bool {
        self.provenance.is_estimated()
    }
}

/// Per-domain payload
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuoteData {
    ThaiGold(GoldPriceBoard),
    WorldGold(WorldGoldPrice),
    ExchangeRate(ExchangeRateTable),
    LoanRate(LoanRateTable),
    Search(SearchDigest),
}

impl QuoteData {
    pub fn as_exchange_rate(&self) -> Option<&ExchangeRateTable> {
        match self {
            Self::ExchangeRate(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_world_gold(&self) -> Option<&WorldGoldPrice> {
        match self {
            Self::WorldGold(price) => Some(price),
            _ => None,
        }
    }

    pub fn as_loan_rate(&self) -> Option<&LoanRateTable> {
        match self {
            Self::LoanRate(table) => Some(table),
            _ => None,
        }
    }
}

// ============================================================================
// Thai gold
// ============================================================================

/// Gold Traders Association board price
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldPriceBoard {
    pub date: String,
    pub update_time: String,
    /// Gold bar first, ornament second
    pub prices: Vec<GoldPriceEntry>,
    pub change: GoldPriceChange,
}

/// Buy/sell pair in baht per baht-weight, kept as the provider prints it
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GoldPriceEntry {
    pub name: String,
    pub buy: Option<String>,
    pub sell: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldPriceChange {
    pub compare_previous: Option<String>,
    pub compare_yesterday: Option<String>,
}

// ============================================================================
// World gold
// ============================================================================

/// XAU spot price per troy ounce
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldGoldPrice {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub change: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub change_percent: Option<Decimal>,

    #[serde(rename = "high24h", with = "rust_decimal::serde::float_option")]
    pub high_24h: Option<Decimal>,

    #[serde(rename = "low24h", with = "rust_decimal::serde::float_option")]
    pub low_24h: Option<Decimal>,

    pub currency: String,
}

// ============================================================================
// Exchange rates
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateTable {
    /// Reporting period the rates belong to (YYYY-MM-DD)
    pub period: String,
    pub currencies: Vec<CurrencyRate>,
}

impl ExchangeRateTable {
    pub fn currency(&self, currency_id: &str) -> Option<&CurrencyRate> {
        self.currencies
            .iter()
            .find(|c| c.currency_id == currency_id)
    }
}

/// THB per one unit of foreign currency, fixed to 4 decimals.
/// `None` means the provider sent something unparseable.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRate {
    pub currency_id: String,
    pub currency_name_th: String,
    pub currency_name_eng: String,
    pub buying_sight: Option<Decimal>,
    pub buying_transfer: Option<Decimal>,
    pub selling: Option<Decimal>,
    pub mid_rate: Option<Decimal>,
}

// ============================================================================
// Loan rates
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanRateKind {
    /// Group averages
    #[default]
    Average,
    /// One row per bank
    Individual,
}

impl LoanRateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Individual => "individual",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoanRateTable {
    pub kind: LoanRateKind,
    pub period: String,
    pub thai_commercial_banks: Vec<LoanRateRow>,
    pub foreign_banks: Vec<LoanRateRow>,
}

/// Percent per year
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoanRateRow {
    pub name_th: String,
    pub name_eng: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub mor: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub mlr: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub mrr: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub ceiling_rate: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub default_rate: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub creditcard_min: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub creditcard_max: Option<Decimal>,
}

// ============================================================================
// Search
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchDigest {
    pub query: String,
    pub hits: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

// ============================================================================
// Reporting periods
// ============================================================================

/// Inclusive date window sent to period-based statistics APIs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `days` days back from `end`, inclusive of both ends
    pub fn trailing(end: NaiveDate, days: u64) -> Self {
        let start = end.checked_sub_days(Days::new(days)).unwrap_or(end);
        Self { start, end }
    }

    /// Trailing window ending today (UTC)
    pub fn trailing_days(days: u64) -> Self {
        Self::trailing(Utc::now().date_naive(), days)
    }

    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trailing_period() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let range = PeriodRange::trailing(end, 5);
        assert_eq!(range.start_param(), "2024-02-26");
        assert_eq!(range.end_param(), "2024-03-02");
    }

    #[test]
    fn test_quote_serializes_camel_case_envelope() {
        let quote = MarketQuote::new(
            Domain::WorldGold,
            "goldapi",
            "GoldAPI.io",
            QuoteData::WorldGold(WorldGoldPrice {
                price: dec!(2650.5),
                change: None,
                change_percent: Some(dec!(0.32)),
                high_24h: None,
                low_24h: None,
                currency: "USD".into(),
            }),
        )
        .with_provenance(Provenance::Secondary);

        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["domain"], "world_gold");
        assert_eq!(json["sourceId"], "goldapi");
        assert_eq!(json["provenance"], "secondary");
        assert!(json["asOf"].is_string());
        assert_eq!(json["data"]["price"], 2650.5);
        assert!(json["data"]["change"].is_null());
        assert_eq!(json["data"]["changePercent"], 0.32);
    }

    #[test]
    fn test_unparseable_rate_serializes_as_null() {
        let rate = CurrencyRate {
            currency_id: "USD".into(),
            currency_name_th: String::new(),
            currency_name_eng: String::new(),
            buying_sight: None,
            buying_transfer: Some(dec!(31.7944)),
            selling: None,
            mid_rate: Some(dec!(31.9500)),
        };

        let json = serde_json::to_value(&rate).unwrap();
        assert!(json["buyingSight"].is_null());
        assert_eq!(json["buyingTransfer"], "31.7944");
        assert_eq!(json["midRate"], "31.9500");
    }
}
