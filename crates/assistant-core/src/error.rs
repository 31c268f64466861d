//! Error Types

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Assistant error types
#[derive(Error, Debug)]
pub enum AssistantError {
    /// LLM provider returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unreachable or returned 5xx
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider response could not be understood
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

/// Shown when the LLM call fails for any reason without a specific message
pub const APOLOGY: &str = "ขออภัยครับ เกิดข้อผิดพลาดในการประมวลผล กรุณาลองใหม่อีกครั้ง";

/// Shown when no usable LLM key is configured
pub const MISSING_KEY_NOTICE: &str = "กรุณาตั้งค่า OPENROUTER_API_KEY ใน .env file";

/// Shown when the gateway rate limits us
pub const RATE_LIMITED_NOTICE: &str = "ขออภัยครับ มีการใช้งานมากเกินไป กรุณารอสักครู่แล้วลองใหม่อีกครั้ง";

impl AssistantError {
    /// Thai message safe to show an end user
    pub fn user_message(&self) -> &'static str {
        match self {
            AssistantError::RateLimited(_) => RATE_LIMITED_NOTICE,
            AssistantError::Config(_) | AssistantError::Auth(_) => MISSING_KEY_NOTICE,
            _ => APOLOGY,
        }
    }
}
