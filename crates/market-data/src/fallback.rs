//! Fallback Records
//!
//! Static estimates served when every provider of a domain has failed.
//! Each one has the same shape as a live quote of that domain and is
//! marked `provenance: fallback`.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{
    CurrencyRate, Domain, ExchangeRateTable, GoldPriceBoard, GoldPriceChange, GoldPriceEntry,
    LoanRateKind, LoanRateRow, LoanRateTable, MarketQuote, Provenance, QuoteData, SearchDigest,
    TRACKED_CURRENCIES, WorldGoldPrice,
};
use crate::provider::{FORECAST_QUERY, FOREIGN_AVERAGE_NAME, NEWS_QUERY, THAI_AVERAGE_NAME};
use crate::provider::{GOLD_BAR_NAME, ORNAMENT_NAME};

pub const FALLBACK_SOURCE_ID: &str = "fallback";
pub const FALLBACK_SOURCE_NAME: &str = "Estimated Data";

/// Shown in place of search results when search is unavailable
pub const SEARCH_UNAVAILABLE_NOTE: &str = "ไม่สามารถค้นหาข้อมูลได้";

/// Fallback quote for a domain. Loan rates use the `average` table.
pub fn fallback_quote(domain: Domain) -> MarketQuote {
    let data = match domain {
        Domain::ThaiGold => thai_gold(),
        Domain::WorldGold => world_gold(),
        Domain::ExchangeRate => exchange_rate(),
        Domain::LoanRate => loan_rate(LoanRateKind::Average),
        Domain::News => search(NEWS_QUERY),
        Domain::Forecast => search(FORECAST_QUERY),
    };

    materialize(domain, data)
}

/// Loan-rate fallback labeled with the requested kind
pub fn fallback_loan_rates(kind: LoanRateKind) -> MarketQuote {
    materialize(Domain::LoanRate, loan_rate(kind))
}

fn materialize(domain: Domain, data: QuoteData) -> MarketQuote {
    MarketQuote::new(domain, FALLBACK_SOURCE_ID, FALLBACK_SOURCE_NAME, data)
        .with_provenance(Provenance::Fallback)
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

fn thai_gold() -> QuoteData {
    let entry = |name: &str, buy: &str, sell: &str| GoldPriceEntry {
        name: name.to_string(),
        buy: Some(buy.to_string()),
        sell: Some(sell.to_string()),
    };

    QuoteData::ThaiGold(GoldPriceBoard {
        date: today(),
        update_time: String::new(),
        prices: vec![
            entry(GOLD_BAR_NAME, "43,150.00", "43,250.00"),
            entry(ORNAMENT_NAME, "42,650.00", "43,750.00"),
        ],
        change: GoldPriceChange::default(),
    })
}

fn world_gold() -> QuoteData {
    QuoteData::WorldGold(WorldGoldPrice {
        price: dec!(2644.58),
        change: Some(dec!(-2.46)),
        change_percent: Some(dec!(-0.09)),
        high_24h: Some(dec!(2659.58)),
        low_24h: Some(dec!(2632.58)),
        currency: "USD".into(),
    })
}

fn exchange_rate() -> QuoteData {
    let (id, name_th, name_eng) = TRACKED_CURRENCIES[0];

    QuoteData::ExchangeRate(ExchangeRateTable {
        period: today(),
        currencies: vec![CurrencyRate {
            currency_id: id.into(),
            currency_name_th: name_th.into(),
            currency_name_eng: name_eng.into(),
            buying_sight: Some(dec!(31.7099)),
            buying_transfer: Some(dec!(31.7944)),
            selling: Some(dec!(32.1205)),
            mid_rate: Some(dec!(31.9575)),
        }],
    })
}

#[allow(clippy::too_many_arguments)]
fn loan_row(
    name_th: &str,
    name_eng: &str,
    mor: Decimal,
    mlr: Decimal,
    mrr: Decimal,
    ceiling_rate: Decimal,
    default_rate: Decimal,
    creditcard: Decimal,
) -> LoanRateRow {
    LoanRateRow {
        name_th: name_th.into(),
        name_eng: name_eng.into(),
        mor: Some(mor),
        mlr: Some(mlr),
        mrr: Some(mrr),
        ceiling_rate: Some(ceiling_rate),
        default_rate: Some(default_rate),
        creditcard_min: Some(creditcard),
        creditcard_max: Some(creditcard),
    }
}

fn loan_rate(kind: LoanRateKind) -> QuoteData {
    QuoteData::LoanRate(LoanRateTable {
        kind,
        period: today(),
        thai_commercial_banks: vec![loan_row(
            "เฉลี่ยของธนาคารพาณิชย์จดทะเบียนในประเทศ",
            THAI_AVERAGE_NAME,
            dec!(7.05),
            dec!(6.15),
            dec!(7.05),
            dec!(16.00),
            dec!(18.00),
            dec!(16.00),
        )],
        foreign_banks: vec![loan_row(
            "เฉลี่ยของสาขาธนาคารต่างประเทศ",
            FOREIGN_AVERAGE_NAME,
            dec!(7.50),
            dec!(6.50),
            dec!(7.50),
            dec!(18.00),
            dec!(20.00),
            dec!(18.00),
        )],
    })
}

fn search(query: &str) -> QuoteData {
    QuoteData::Search(SearchDigest {
        query: query.to_string(),
        hits: Vec::new(),
        note: Some(SEARCH_UNAVAILABLE_NOTE.to_string()),
    })
}
