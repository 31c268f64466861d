//! Bank of Thailand API envelope
//!
//! Every BOT statistics endpoint wraps its rows the same way:
//! `{"result": {"timestamp": ..., "data": {"data_detail": [...]}}}`

use serde::Deserialize;

pub(crate) const BOT_SOURCE_NAME: &str = "ธนาคารแห่งประเทศไทย (Bank of Thailand)";

#[derive(Debug, Deserialize)]
pub struct BotEnvelope<T> {
    pub result: Option<BotResult<T>>,
}

#[derive(Debug, Deserialize)]
pub struct BotResult<T> {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub data: Option<BotData<T>>,
}

#[derive(Debug, Deserialize)]
pub struct BotData<T> {
    pub data_detail: Option<Vec<T>>,
}

impl<T> BotEnvelope<T> {
    /// Rows, or empty when any level of the envelope is missing
    pub fn into_details(self) -> Vec<T> {
        self.result
            .and_then(|r| r.data)
            .and_then(|d| d.data_detail)
            .unwrap_or_default()
    }
}
