//! Response Normalization Helpers
//!
//! Shared coercions used by every provider's `normalize` function.
//! All of them are pure: the same raw input always yields the same output.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decimal places used for currency rates
pub const RATE_DECIMALS: u32 = 4;

/// Parse a provider number string. Thousands separators are tolerated.
///
/// Returns `None` for blanks and anything that is not a number; callers must
/// treat that as "unknown", never as zero.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Round half away from zero and pin the scale, so `31.95` renders `31.9500`
pub fn to_fixed(value: Decimal, decimals: u32) -> Decimal {
    let mut fixed = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    fixed.rescale(decimals);
    fixed
}

pub fn fixed_decimal(raw: &str, decimals: u32) -> Option<Decimal> {
    parse_decimal(raw).map(|value| to_fixed(value, decimals))
}

/// Accept a JSON number or a numeric string
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(text),
        _ => None,
    }
}

/// Trimmed, non-empty copy of a provider string
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Most recent reporting period present, by value rather than array order.
///
/// ISO dates compare chronologically; anything else (e.g. `2024-01`) falls
/// back to string order, which is still chronological for zero-padded
/// periods.
pub fn latest_period<'a, I>(periods: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    periods
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .max_by(|a, b| compare_periods(a, b))
}

fn compare_periods(a: &str, b: &str) -> Ordering {
    match (
        NaiveDate::parse_from_str(a, "%Y-%m-%d"),
        NaiveDate::parse_from_str(b, "%Y-%m-%d"),
    ) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Deserialize a string-ish field leniently: strings pass through, numbers
/// are printed, `null` and anything else become `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}
