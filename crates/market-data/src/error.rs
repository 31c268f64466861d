//! Error Types for Market Data

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketError>;

/// Failure of a single provider attempt.
///
/// These never reach a feed's caller; the feed logs them and moves on to
/// the next source.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Credential not configured for {0}")]
    MissingCredential(&'static str),

    #[error("{provider} responded with HTTP {status}")]
    Upstream { provider: &'static str, status: u16 },

    #[error("Malformed payload from {provider}: {reason}")]
    Malformed {
        provider: &'static str,
        reason: String,
    },

    #[error("No usable data from {0}")]
    NoData(&'static str),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MarketError {
    pub fn malformed(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            provider,
            reason: reason.into(),
        }
    }

    /// Whether the provider was skipped without touching the network
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential(_))
    }
}
