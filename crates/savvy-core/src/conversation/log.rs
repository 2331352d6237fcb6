//! Append-only conversation log.

use serde::{Deserialize, Serialize};

use super::message::{ChatTurn, Message};

/// The message history of one session.
///
/// Messages are only ever appended. The single way to shrink the log is
/// [`ConversationLog::clear`], used by a full session reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user message and returns it.
    pub fn push_user(&mut self, text: impl Into<String>) -> &Message {
        self.push(Message::user(text))
    }

    /// Appends a bot message and returns it.
    pub fn push_bot(&mut self, text: impl Into<String>) -> &Message {
        self.push(Message::bot(text))
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Text of the most recent user message.
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| !m.is_bot)
            .map(|m| m.text.as_str())
    }

    /// The log as `{role, content}` turns for a responder.
    pub fn to_history(&self) -> Vec<ChatTurn> {
        self.messages.iter().map(ChatTurn::from).collect()
    }

    /// Drops every message. Only a full session reset calls this.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::MessageRole;

    #[test]
    fn test_append_and_history() {
        let mut log = ConversationLog::new();
        log.push_bot("Hello!");
        log.push_user("Show me trends");
        log.push_bot("Here you go");

        assert_eq!(log.len(), 3);
        assert_eq!(log.last_user_text(), Some("Show me trends"));

        let history = log.to_history();
        assert_eq!(history[0].role, MessageRole::Assistant);
        assert_eq!(history[1].role, MessageRole::User);
        assert_eq!(history[1].content, "Show me trends");
    }

    #[test]
    fn test_ids_are_unique_and_clear_resets() {
        let mut log = ConversationLog::new();
        let first = log.push_user("a").id;
        let second = log.push_user("b").id;
        assert_ne!(first, second);

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.last_user_text(), None);
    }

    #[test]
    fn test_turn_wire_shape() {
        let json = serde_json::to_value(ChatTurn::assistant("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hi"}));
    }
}
