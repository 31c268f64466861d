//! Chat Turns
//!
//! The turn format the dashboard sends on every chat request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a turn's author
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single turn in a conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,

    pub content: String,

    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Model id that produced an assistant turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            model: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_creation() {
        let turn = ChatTurn::user("ราคาทองวันนี้");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "ราคาทองวันนี้");
        assert!(turn.model.is_none());
    }

    #[test]
    fn test_deserialize_client_turn() {
        let turn: ChatTurn = serde_json::from_str(
            r#"{"role": "assistant", "content": "สวัสดีครับ", "timestamp": "2024-01-03T09:30:00.000Z", "model": "gpt"}"#,
        )
        .unwrap();

        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.model.as_deref(), Some("gpt"));
    }

    #[test]
    fn test_timestamp_optional() {
        let turn: ChatTurn = serde_json::from_str(r#"{"role": "user", "content": "hi"}"#).unwrap();
        assert_eq!(turn.role, Role::User);
    }
}
