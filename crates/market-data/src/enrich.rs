//! Enrichment Blocks
//!
//! Plain-text rendering of the quotes fetched for one routed topic. The
//! text is what the LLM sees, so every figure carries its source and
//! whether it is live.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{
    ExchangeRateTable, GoldPriceBoard, LoanRateRow, LoanRateTable, MarketQuote, QuoteData,
    SearchDigest, WorldGoldPrice,
};
use crate::normalize::to_fixed;
use crate::router::Topic;

const MISSING: &str = "-";

#[derive(Clone, Debug, Serialize)]
pub struct EnrichmentBlock {
    pub topic: Topic,
    pub label: &'static str,
    pub quotes: Vec<MarketQuote>,
}

impl EnrichmentBlock {
    pub fn new(topic: Topic, quotes: Vec<MarketQuote>) -> Self {
        Self {
            topic,
            label: topic.label(),
            quotes,
        }
    }

    pub fn has_estimates(&self) -> bool {
        self.quotes.iter().any(MarketQuote::is_estimated)
    }

    /// Quotes rendered one after another, separated by blank lines
    pub fn render(&self) -> String {
        self.quotes
            .iter()
            .map(render_quote)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

pub fn render_quote(quote: &MarketQuote) -> String {
    let mut out = format!(
        "แหล่งที่มา: {} ({})\nเวลาที่ดึงข้อมูล: {}\n",
        quote.source_name,
        quote.provenance.label_th(),
        quote.as_of.format("%Y-%m-%d %H:%M UTC"),
    );

    match &quote.data {
        QuoteData::ThaiGold(board) => render_thai_gold(&mut out, board),
        QuoteData::WorldGold(price) => render_world_gold(&mut out, price),
        QuoteData::ExchangeRate(table) => render_exchange(&mut out, table),
        QuoteData::LoanRate(table) => render_loan(&mut out, table),
        QuoteData::Search(digest) => render_search(&mut out, digest),
    }

    out.trim_end().to_string()
}

fn opt_str(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}

fn opt_dec(value: Option<Decimal>, decimals: u32) -> String {
    value.map_or_else(|| MISSING.to_string(), |d| to_fixed(d, decimals).to_string())
}

fn render_thai_gold(out: &mut String, board: &GoldPriceBoard) {
    let _ = writeln!(out, "ราคาทองคำไทย (บาทต่อน้ำหนัก 1 บาท) วันที่ {} {}", board.date, board.update_time);
    for entry in &board.prices {
        let _ = writeln!(
            out,
            "- {}: รับซื้อ {} | ขายออก {}",
            entry.name,
            opt_str(entry.buy.as_deref()),
            opt_str(entry.sell.as_deref()),
        );
    }
    if let Some(change) = board.change.compare_previous.as_deref() {
        let _ = writeln!(out, "เปลี่ยนแปลงจากครั้งก่อน: {change}");
    }
    if let Some(change) = board.change.compare_yesterday.as_deref() {
        let _ = writeln!(out, "เปลี่ยนแปลงจากเมื่อวาน: {change}");
    }
}

fn render_world_gold(out: &mut String, price: &WorldGoldPrice) {
    let _ = writeln!(out, "ราคาทองคำโลก (XAU/{}): {} ต่อออนซ์", price.currency, to_fixed(price.price, 2));
    let _ = writeln!(
        out,
        "เปลี่ยนแปลง: {} ({}%) | สูงสุด 24 ชม.: {} | ต่ำสุด 24 ชม.: {}",
        opt_dec(price.change, 2),
        opt_dec(price.change_percent, 2),
        opt_dec(price.high_24h, 2),
        opt_dec(price.low_24h, 2),
    );
}

fn render_exchange(out: &mut String, table: &ExchangeRateTable) {
    let _ = writeln!(out, "อัตราแลกเปลี่ยน (บาทต่อ 1 หน่วย) งวดวันที่ {}", table.period);
    for rate in &table.currencies {
        let _ = writeln!(
            out,
            "- {} {}: ซื้อตั๋วเงิน {} | ซื้อเงินโอน {} | ขาย {} | กลาง {}",
            rate.currency_id,
            rate.currency_name_th,
            opt_dec(rate.buying_sight, 4),
            opt_dec(rate.buying_transfer, 4),
            opt_dec(rate.selling, 4),
            opt_dec(rate.mid_rate, 4),
        );
    }
}

fn render_loan_row(out: &mut String, row: &LoanRateRow) {
    let name = if row.name_th.is_empty() { &row.name_eng } else { &row.name_th };
    let _ = writeln!(
        out,
        "- {}: MOR {} | MLR {} | MRR {} | เพดาน {} | ผิดนัด {} | บัตรเครดิต {}-{}",
        name,
        opt_dec(row.mor, 2),
        opt_dec(row.mlr, 2),
        opt_dec(row.mrr, 2),
        opt_dec(row.ceiling_rate, 2),
        opt_dec(row.default_rate, 2),
        opt_dec(row.creditcard_min, 2),
        opt_dec(row.creditcard_max, 2),
    );
}

fn render_loan(out: &mut String, table: &LoanRateTable) {
    let _ = writeln!(out, "อัตราดอกเบี้ยเงินกู้ (% ต่อปี) งวด {} ({})", table.period, table.kind.as_str());

    let _ = writeln!(out, "ธนาคารพาณิชย์จดทะเบียนในประเทศ:");
    for row in &table.thai_commercial_banks {
        render_loan_row(out, row);
    }

    let _ = writeln!(out, "สาขาธนาคารต่างประเทศ:");
    for row in &table.foreign_banks {
        render_loan_row(out, row);
    }
}

fn render_search(out: &mut String, digest: &SearchDigest) {
    let _ = writeln!(out, "คำค้นหา: {}", digest.query);
    for hit in &digest.hits {
        let _ = writeln!(out, "- {} ({})\n  {}", hit.title, hit.url, hit.snippet);
    }
    if let Some(note) = &digest.note {
        let _ = writeln!(out, "หมายเหตุ: {note}");
    }
}
