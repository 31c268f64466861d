//! Bank of Thailand - commercial bank loan rates (MOR / MLR / MRR)
//!
//! Two endpoints share one envelope: `avg_loan_rate` returns one average
//! row per bank group, `loan_rate` returns one row per bank tagged with its
//! group. Both are reduced to the most recent period in the window.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::bot::{BOT_SOURCE_NAME, BotEnvelope};
use super::{QuoteProvider, read_json};
use crate::error::{MarketError, Result};
use crate::model::{Domain, LoanRateKind, LoanRateRow, LoanRateTable, MarketQuote, PeriodRange, QuoteData};
use crate::normalize::{decimal_from_json, latest_period, non_empty};

/// Default lookback when the caller gives no period window
pub const DEFAULT_WINDOW_DAYS: u64 = 30;

pub const THAI_AVERAGE_NAME: &str = "Average of Commercial Banks registered in Thailand";
pub const FOREIGN_AVERAGE_NAME: &str = "Average of Foreign Bank Branches";
pub const THAI_BANK_GROUP: &str = "Commercial Banks registered in Thailand";
pub const FOREIGN_BANK_GROUP: &str = "Foreign Bank Branches";

/// One row of either loan-rate endpoint.
///
/// Average rows carry `name_*`; per-bank rows carry `bank_name_*` and
/// `bank_type_name_eng`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotLoanRateDetail {
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub name_th: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub name_eng: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub bank_type_name_eng: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub bank_name_th: Option<String>,
    #[serde(default, deserialize_with = "crate::normalize::lenient_string")]
    pub bank_name_eng: Option<String>,
    #[serde(default)]
    pub mor: Value,
    #[serde(default)]
    pub mlr: Value,
    #[serde(default)]
    pub mrr: Value,
    #[serde(default)]
    pub ceiling_rate: Value,
    #[serde(default)]
    pub default_rate: Value,
    #[serde(default)]
    pub creditcard_min: Value,
    #[serde(default)]
    pub creditcard_max: Value,
}

impl BotLoanRateDetail {
    fn period(&self) -> Option<&str> {
        self.period.as_deref().map(str::trim)
    }

    fn to_row(&self) -> LoanRateRow {
        let name = |primary: &Option<String>, bank: &Option<String>| {
            primary
                .as_deref()
                .and_then(non_empty)
                .or_else(|| bank.as_deref().and_then(non_empty))
                .unwrap_or_default()
        };

        LoanRateRow {
            name_th: name(&self.name_th, &self.bank_name_th),
            name_eng: name(&self.name_eng, &self.bank_name_eng),
            mor: decimal_from_json(&self.mor),
            mlr: decimal_from_json(&self.mlr),
            mrr: decimal_from_json(&self.mrr),
            ceiling_rate: decimal_from_json(&self.ceiling_rate),
            default_rate: decimal_from_json(&self.default_rate),
            creditcard_min: decimal_from_json(&self.creditcard_min),
            creditcard_max: decimal_from_json(&self.creditcard_max),
        }
    }

    fn name_eng_is(&self, expected: &str) -> bool {
        self.name_eng.as_deref().map(str::trim) == Some(expected)
    }

    fn group_is(&self, expected: &str) -> bool {
        self.bank_type_name_eng.as_deref().map(str::trim) == Some(expected)
    }
}

pub struct BotLoanRateProvider {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    kind: LoanRateKind,
    range: Option<PeriodRange>,
}

impl BotLoanRateProvider {
    pub const ID: &'static str = "bot-loan-rate";

    pub fn new(client: reqwest::Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token,
            kind: LoanRateKind::Average,
            range: None,
        }
    }

    pub fn with_kind(mut self, kind: LoanRateKind) -> Self {
        self.kind = kind;
        self
    }

    /// Explicit period window; otherwise the trailing 30 days at fetch time
    pub fn with_range(mut self, range: Option<PeriodRange>) -> Self {
        self.range = range;
        self
    }

    fn endpoint(&self) -> &'static str {
        match self.kind {
            LoanRateKind::Average => "avg_loan_rate",
            LoanRateKind::Individual => "loan_rate",
        }
    }

    pub fn normalize(kind: LoanRateKind, details: &[BotLoanRateDetail]) -> Result<QuoteData> {
        let period = latest_period(details.iter().filter_map(BotLoanRateDetail::period))
            .ok_or(MarketError::NoData(Self::ID))?;

        let latest: Vec<&BotLoanRateDetail> =
            details.iter().filter(|d| d.period() == Some(period)).collect();

        let (thai_commercial_banks, foreign_banks): (Vec<LoanRateRow>, Vec<LoanRateRow>) = match kind {
            LoanRateKind::Average => (
                latest
                    .iter()
                    .find(|d| d.name_eng_is(THAI_AVERAGE_NAME))
                    .map(|d| d.to_row())
                    .into_iter()
                    .collect(),
                latest
                    .iter()
                    .find(|d| d.name_eng_is(FOREIGN_AVERAGE_NAME))
                    .map(|d| d.to_row())
                    .into_iter()
                    .collect(),
            ),
            LoanRateKind::Individual => (
                latest
                    .iter()
                    .filter(|d| d.group_is(THAI_BANK_GROUP))
                    .map(|d| d.to_row())
                    .collect(),
                latest
                    .iter()
                    .filter(|d| d.group_is(FOREIGN_BANK_GROUP))
                    .map(|d| d.to_row())
                    .collect(),
            ),
        };

        if thai_commercial_banks.is_empty() && foreign_banks.is_empty() {
            return Err(MarketError::NoData(Self::ID));
        }

        Ok(QuoteData::LoanRate(LoanRateTable {
            kind,
            period: period.to_string(),
            thai_commercial_banks,
            foreign_banks,
        }))
    }
}

#[async_trait]
impl QuoteProvider for BotLoanRateProvider {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn domain(&self) -> Domain {
        Domain::LoanRate
    }

    fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    async fn fetch(&self) -> Result<MarketQuote> {
        let token = self
            .token
            .as_deref()
            .ok_or(MarketError::MissingCredential(Self::ID))?;

        let range = self
            .range
            .unwrap_or_else(|| PeriodRange::trailing_days(DEFAULT_WINDOW_DAYS));
        let url = format!("{}/LoanRate/v2/{}/", self.base_url, self.endpoint());

        tracing::debug!(provider = Self::ID, kind = self.kind.as_str(), url = %url, "Fetching loan rates");

        let request = self
            .client
            .get(&url)
            .query(&[
                ("start_period", range.start_param()),
                ("end_period", range.end_param()),
            ])
            .header("Authorization", token)
            .header("Accept", "application/json");

        let envelope: BotEnvelope<BotLoanRateDetail> = read_json(Self::ID, request).await?;
        let data = Self::normalize(self.kind, &envelope.into_details())?;

        Ok(MarketQuote::new(Domain::LoanRate, Self::ID, BOT_SOURCE_NAME, data))
    }
}
