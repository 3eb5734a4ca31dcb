use chrono::{DateTime, Utc};
use ridematch_core::query::{accumulate, ParsedQuery, DEFAULT_HISTORY_WINDOW};
use serde::{Deserialize, Serialize};

use crate::parser::QueryParser;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into(), sent_at: Utc::now() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, text: text.into(), sent_at: Utc::now() }
    }
}

/// Messages exchanged so far in one conversation.
///
/// Only the most recent user messages feed the accumulated query; older turns
/// and assistant replies are kept for display but never parsed.
#[derive(Clone, Debug)]
pub struct ConversationContext {
    messages: Vec<ChatMessage>,
    history_window: usize,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl ConversationContext {
    pub fn new(history_window: usize) -> Self {
        Self { messages: Vec::new(), history_window }
    }

    pub fn with_messages(history_window: usize, messages: Vec<ChatMessage>) -> Self {
        Self { messages, history_window }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// The last `history_window` user messages, oldest first.
    pub fn recent_user_texts(&self) -> Vec<&str> {
        let mut recent = self
            .messages
            .iter()
            .rev()
            .filter(|message| message.role == Role::User)
            .take(self.history_window)
            .map(|message| message.text.as_str())
            .collect::<Vec<_>>();
        recent.reverse();
        recent
    }

    /// Parses the recent history plus `current` and folds them in chronological order.
    pub fn accumulated_query(&self, parser: &QueryParser, current: &str) -> ParsedQuery {
        let parsed = self
            .recent_user_texts()
            .into_iter()
            .chain(std::iter::once(current))
            .map(|text| parser.parse(text))
            .collect::<Vec<_>>();

        accumulate(&parsed)
    }
}

#[cfg(test)]
mod tests {
    use ridematch_core::query::Purpose;
    use rust_decimal::Decimal;

    use super::{ChatMessage, ConversationContext};
    use crate::parser::QueryParser;

    fn context(texts: &[&str]) -> ConversationContext {
        let mut context = ConversationContext::default();
        for text in texts {
            context.push(ChatMessage::user(*text));
            context.push(ChatMessage::assistant("Dạ, em gợi ý vài mẫu ạ"));
        }
        context
    }

    #[test]
    fn window_keeps_last_three_user_messages_oldest_first() {
        let context = context(&["một", "hai", "ba", "bốn"]);

        assert_eq!(context.recent_user_texts(), vec!["hai", "ba", "bốn"]);
    }

    #[test]
    fn earlier_facts_persist_until_restated() {
        let context = context(&["em cao 1m6", "tầm 40-55tr"]);
        let query = context.accumulated_query(&QueryParser::new(), "đi làm hằng ngày");

        assert_eq!(query.height_cm, Some(160));
        assert_eq!(query.budget_max, Some(Decimal::from(55_000_000)));
        assert_eq!(query.purpose, Some(Purpose::City));
    }

    #[test]
    fn newer_message_overrides_conflicting_value() {
        let context = context(&["tầm 40-55tr", "thích xe honda"]);
        let query = context.accumulated_query(&QueryParser::new(), "thôi tăng lên 60-70tr");

        assert_eq!(query.budget_min, Some(Decimal::from(60_000_000)));
        assert_eq!(query.budget_max, Some(Decimal::from(70_000_000)));
        assert!(query.preferred_brands.contains("honda"));
    }

    #[test]
    fn facts_outside_window_are_forgotten() {
        let context = context(&["em cao 1m6", "a", "b", "c"]);
        let query = context.accumulated_query(&QueryParser::new(), "d");

        assert!(query.height_cm.is_none());
    }

    #[test]
    fn zero_window_uses_only_current_message() {
        let mut context = ConversationContext::new(0);
        context.push(ChatMessage::user("xe yamaha"));

        let query = context.accumulated_query(&QueryParser::new(), "cao 170cm");
        assert!(query.preferred_brands.is_empty());
        assert_eq!(query.height_cm, Some(170));
    }
}
