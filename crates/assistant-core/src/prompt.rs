//! Prompt Composition
//!
//! Builds the single text prompt sent to the LLM:
//!
//! ```text
//! <system prompt>
//!
//! <label A>
//! ...figures...
//! </label A>
//!
//! ประวัติการสนทนา:
//! ผู้ใช้: ...
//! ผู้ช่วย: ...
//!
//! คำถาม: <latest message>
//! ```

use serde::Serialize;

use crate::message::{ChatTurn, Role};

/// Prior turns kept in the prompt, newest last
pub const DEFAULT_HISTORY_TURNS: usize = 10;

const QUESTION_PREFIX: &str = "คำถาม: ";
const HISTORY_HEADING: &str = "ประวัติการสนทนา:";

/// Labeled text attached to the prompt inside `<label>` delimiters
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContextBlock {
    pub label: String,
    pub body: String,
}

impl ContextBlock {
    pub fn new(label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            body: body.into(),
        }
    }

    fn render(&self) -> String {
        format!("<{label}>\n{}\n</{label}>", self.body.trim(), label = self.label)
    }
}

/// Latest message of a conversation, empty when there is none
pub fn last_message(history: &[ChatTurn]) -> &str {
    history.last().map_or("", |turn| turn.content.as_str())
}

#[derive(Clone, Debug)]
pub struct PromptComposer {
    max_history_turns: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self {
            max_history_turns: DEFAULT_HISTORY_TURNS,
        }
    }
}

impl PromptComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_history_turns(mut self, turns: usize) -> Self {
        self.max_history_turns = turns;
        self
    }

    /// Blocks keep the order given. The last turn is the question; earlier
    /// user and assistant turns become the history section.
    pub fn compose(&self, system_prompt: &str, blocks: &[ContextBlock], history: &[ChatTurn]) -> String {
        let mut sections: Vec<String> = Vec::with_capacity(blocks.len() + 3);

        let system_prompt = system_prompt.trim();
        if !system_prompt.is_empty() {
            sections.push(system_prompt.to_string());
        }

        sections.extend(blocks.iter().map(ContextBlock::render));

        let prior = &history[..history.len().saturating_sub(1)];
        let kept: Vec<String> = prior
            .iter()
            .filter(|turn| turn.role != Role::System && !turn.content.trim().is_empty())
            .rev()
            .take(self.max_history_turns)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|turn| {
                let speaker = match turn.role {
                    Role::Assistant => "ผู้ช่วย",
                    _ => "ผู้ใช้",
                };
                format!("{speaker}: {}", turn.content.trim())
            })
            .collect();

        if !kept.is_empty() {
            sections.push(format!("{HISTORY_HEADING}\n{}", kept.join("\n")));
        }

        sections.push(format!("{QUESTION_PREFIX}{}", last_message(history)));

        let prompt = sections.join("\n\n");
        tracing::debug!(blocks = blocks.len(), history = kept.len(), chars = prompt.len(), "Composed prompt");
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_orders_sections() {
        let blocks = vec![
            ContextBlock::new("ข้อมูลอัตราดอกเบี้ยเงินกู้", "MOR 7.05 | MLR 6.15 | MRR 7.05"),
            ContextBlock::new("ข้อมูลราคาทองคำ", "ทองคำแท่ง 96.5%"),
        ];
        let history = vec![ChatTurn::user("ดอกเบี้ยกับราคาทอง")];

        let prompt = PromptComposer::new().compose("SYSTEM", &blocks, &history);

        let loan = prompt.find("<ข้อมูลอัตราดอกเบี้ยเงินกู้>").unwrap();
        let gold = prompt.find("<ข้อมูลราคาทองคำ>").unwrap();
        assert!(prompt.starts_with("SYSTEM"));
        assert!(loan < gold);
        assert!(prompt.contains("</ข้อมูลอัตราดอกเบี้ยเงินกู้>"));
        assert!(prompt.ends_with("คำถาม: ดอกเบี้ยกับราคาทอง"));
        assert!(!prompt.contains(HISTORY_HEADING));
    }

    #[test]
    fn test_history_excludes_question_and_is_capped() {
        let history = vec![
            ChatTurn::user("one"),
            ChatTurn::assistant("two"),
            ChatTurn::user("three"),
            ChatTurn::assistant("four"),
            ChatTurn::user("latest"),
        ];

        let prompt = PromptComposer::new()
            .with_max_history_turns(2)
            .compose("", &[], &history);

        assert!(!prompt.contains("one"));
        assert!(prompt.contains("ผู้ใช้: three\nผู้ช่วย: four"));
        assert_eq!(prompt.matches("latest").count(), 1);
    }

    #[test]
    fn test_empty_history() {
        let prompt = PromptComposer::new().compose("SYSTEM", &[], &[]);
        assert_eq!(prompt, "SYSTEM\n\nคำถาม: ");
    }
}
