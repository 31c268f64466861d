//! # market-data
//!
//! Live market figures for the pawn analytics dashboard, with an
//! "always degrade, never crash" fetch policy.
//!
//! ## Fetch chain
//!
//! ```text
//! ┌──────────┐   fail / no credential   ┌────────────┐   fail   ┌────────────────┐
//! │ Primary  │─────────────────────────▶│ Secondary  │─────────▶│ FallbackRecord │
//! │ provider │                          │ provider   │          │ (static)       │
//! └────┬─────┘                          └─────┬──────┘          └───────┬────────┘
//!      │ normalize                            │ normalize               │
//!      └──────────────────────────────────────┴─────────────────────────┴──▶ MarketQuote
//! ```
//!
//! Every domain (Thai gold, world gold, exchange rate, loan rate, news,
//! forecast) is served by a [`Feed`]. A feed never returns an error: the
//! worst case is a quote whose [`Provenance`] is `fallback`.
//!
//! The [`router`] maps a free-text chat message to the topics worth
//! fetching, and [`MarketData::enrich`] turns a topic into a prompt block.

pub mod config;
pub mod enrich;
pub mod error;
pub mod estimate;
pub mod fallback;
pub mod feed;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod router;
pub mod service;

pub use config::MarketConfig;
pub use enrich::EnrichmentBlock;
pub use error::{MarketError, Result};
pub use estimate::{ThaiGoldEstimate, estimate_thai_gold};
pub use feed::{FetchOutcome, Feed, ProviderFailure};
pub use model::{
    Domain, LoanRateKind, MarketQuote, PeriodRange, Provenance, QuoteData,
};
pub use router::{Topic, route};
pub use service::{EstimateInput, GoldEstimateReport, MarketData};

/// System prompt for the pawn assistant.
///
/// Live figures are appended after it as delimited blocks, one per topic.
pub const PAWN_ASSISTANT_PROMPT: &str = r#"คุณเป็น AI Assistant ผู้เชี่ยวชาญด้านทองคำและการเงินสำหรับระบบสำนักงานธนานุเคราะห์ (ร้านรับจำนำ)
ชื่อ "Pawn AI Assistant"

## วิธีใช้ข้อมูลที่แนบมา

- ข้อมูลแต่ละชุดอยู่ในแท็ก <ชื่อหัวข้อ> ... </ชื่อหัวข้อ> ให้อ้างอิงแหล่งที่มาตามแท็กนั้น
- ใช้ตัวเลขจากข้อมูลที่แนบมาเท่านั้น อย่าแต่งตัวเลขเอง
- ถ้าข้อมูลระบุว่าเป็น "ข้อมูลประมาณการ" ให้แจ้งผู้ใช้ว่าไม่ใช่ข้อมูลสด
- ห้ามแสดง JSON หรือข้อมูลดิบ

## วิธีการตอบ

- ใช้ภาษาไทยที่เป็นมิตรและเข้าใจง่าย จัดรูปแบบด้วย Markdown
- ระบุแหล่งที่มาและเวลาของข้อมูลเสมอ
- วิเคราะห์แนวโน้มให้มีประโยชน์ต่อร้านรับจำนำ
- แนะนำให้ตรวจสอบราคาจากแหล่งข้อมูลหลักอีกครั้งก่อนทำธุรกรรม"#;
