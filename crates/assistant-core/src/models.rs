//! Model Registry
//!
//! The closed set of chat models the dashboard offers. Unknown ids resolve
//! to the configured default instead of failing.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: ModelId = ModelId::Claude;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelId {
    Gpt,
    #[default]
    Claude,
    Grok,
}

impl ModelId {
    pub const ALL: [Self; 3] = [Self::Gpt, Self::Claude, Self::Grok];

    /// Short id used by the dashboard
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gpt => "gpt",
            Self::Claude => "claude",
            Self::Grok => "grok",
        }
    }

    /// Provider model identifier sent upstream
    pub fn model_name(self) -> &'static str {
        match self {
            Self::Gpt => "openai/gpt-4o",
            Self::Claude => "anthropic/claude-sonnet-4",
            Self::Grok => "x-ai/grok-3-beta",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Gpt => "GPT-4o (OpenAI)",
            Self::Claude => "Claude Sonnet 4 (Anthropic)",
            Self::Grok => "Grok 3 Beta (xAI)",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(raw))
    }

    /// Known id, or `default` for anything else (including no id at all)
    pub fn resolve(raw: Option<&str>, default: Self) -> Self {
        match raw.and_then(Self::parse) {
            Some(id) => id,
            None => {
                if let Some(unknown) = raw {
                    tracing::debug!(model = unknown, fallback = default.as_str(), "Unknown model id");
                }
                default
            }
        }
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_entries() {
        assert_eq!(ModelId::Gpt.model_name(), "openai/gpt-4o");
        assert_eq!(ModelId::Claude.display_name(), "Claude Sonnet 4 (Anthropic)");
        assert_eq!(ModelId::Grok.model_name(), "x-ai/grok-3-beta");
        assert_eq!(DEFAULT_MODEL, ModelId::Claude);
    }

    #[test]
    fn test_unknown_resolves_to_default() {
        assert_eq!(ModelId::resolve(Some("llama"), ModelId::Claude), ModelId::Claude);
        assert_eq!(ModelId::resolve(Some("llama"), ModelId::Grok), ModelId::Grok);
        assert_eq!(ModelId::resolve(None, ModelId::Gpt), ModelId::Gpt);
        assert_eq!(ModelId::resolve(Some("GPT"), ModelId::Claude), ModelId::Gpt);
    }
}
