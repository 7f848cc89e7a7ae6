//! Conversation transcript and fragment folding.
//!
//! A [`Conversation`] is the ordered list of turns for one interview plus
//! the `loading` flag. The session owns the live copy and publishes clones
//! of it as snapshots after every change.

use serde::Serialize;

use crate::models::{Message, MessageRole};

/// Ordered turns of one interview session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
    loading: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// All turns in chronological order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether an exchange is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent turn, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Content of the trailing assistant turn, if the last turn is one.
    pub fn trailing_assistant(&self) -> Option<&str> {
        self.last()
            .filter(|m| m.is_assistant())
            .map(|m| m.content.as_str())
    }

    /// Append a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Append a standalone assistant turn, never merged with a preceding one.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Fold one streamed fragment into the open assistant turn.
    ///
    /// Extends the trailing assistant message, or starts a new one when the
    /// last turn belongs to the user (or there is none). Fragments are never
    /// deduplicated: the same text twice in a row is legitimate output.
    pub fn fold(&mut self, fragment: &str) {
        match self.messages.last_mut() {
            Some(last) if last.role == MessageRole::Assistant => last.append_token(fragment),
            _ => self.messages.push(Message::assistant(fragment)),
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Drop every turn and clear `loading`.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fragment_opens_assistant_turn() {
        let mut conv = Conversation::new();
        conv.push_user("Hi");
        conv.fold("Hel");

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.messages()[1], Message::assistant("Hel"));
    }

    #[test]
    fn test_following_fragments_extend_turn() {
        let mut conv = Conversation::new();
        conv.push_user("Hi");
        conv.fold("Hel");
        conv.fold("lo!");

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.trailing_assistant(), Some("Hello!"));
    }

    #[test]
    fn test_repeated_fragments_are_not_deduplicated() {
        let mut conv = Conversation::new();
        conv.fold("!");
        conv.fold("!");
        conv.fold("!");
        assert_eq!(conv.trailing_assistant(), Some("!!!"));
    }

    #[test]
    fn test_fold_on_empty_conversation() {
        let mut conv = Conversation::new();
        conv.fold("x");
        assert_eq!(conv.messages(), &[Message::assistant("x")]);
    }

    #[test]
    fn test_new_exchange_opens_new_turn() {
        let mut conv = Conversation::new();
        conv.push_user("q1");
        conv.fold("a1");
        conv.push_user("q2");
        conv.fold("a2");

        let roles: Vec<_> = conv.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant
            ]
        );
        assert_eq!(conv.trailing_assistant(), Some("a2"));
    }

    #[test]
    fn test_trailing_assistant_none_after_user() {
        let mut conv = Conversation::new();
        conv.fold("a");
        conv.push_user("q");
        assert_eq!(conv.trailing_assistant(), None);
    }

    #[test]
    fn test_push_assistant_is_separate_turn() {
        let mut conv = Conversation::new();
        conv.fold("partial");
        conv.push_assistant("sorry");
        assert_eq!(conv.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut conv = Conversation::new();
        conv.push_user("q");
        conv.set_loading(true);
        conv.clear();
        assert!(conv.is_empty());
        assert!(!conv.is_loading());
    }
}
