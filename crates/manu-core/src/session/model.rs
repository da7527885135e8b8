//! Session domain model.
//!
//! A [`Session`] is one assistant conversation: an identifier, a creation
//! time and an append-only [`Transcript`].

use super::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text of the message every new session starts with.
pub const WELCOME_MESSAGE: &str = "Hi! I'm your AI assistant 🤖 I can help you grow your audience, \
plan content and make sense of your insights. What would you like to work on today?";

/// Ordered, append-only message sequence.
///
/// Messages can only be added at the end. Nothing hands out mutable access to
/// a committed message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns the updated sequence.
    ///
    /// The message receives the next sequential id (`msg-N`). Typing
    /// placeholders are never stored; appending one leaves the sequence
    /// unchanged.
    pub fn append(&mut self, mut message: Message) -> &[Message] {
        if !message.is_committable() {
            tracing::warn!("[Transcript] Ignoring append of a typing placeholder");
            return &self.messages;
        }

        message.id = format!("msg-{}", self.messages.len() + 1);
        self.messages.push(message);
        &self.messages
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

    /// Number of text messages sent by the user. Hearts and images are not
    /// questions and are not counted.
    pub fn user_text_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_user_text()).count()
    }
}

/// An assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Message history in display order
    pub transcript: Transcript,
}

impl Session {
    /// Creates a session holding only the welcome message.
    pub fn with_welcome(id: impl Into<String>) -> Self {
        let mut transcript = Transcript::new();
        transcript.append(Message::assistant_text(WELCOME_MESSAGE));

        Self {
            id: id.into(),
            created_at: Utc::now(),
            transcript,
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    /// Appends a message. See [`Transcript::append`].
    pub fn append_message(&mut self, message: Message) -> &[Message] {
        self.transcript.append(message)
    }

    /// Conversation starters are offered until the user says something,
    /// i.e. while only the welcome message exists.
    pub fn shows_conversation_starters(&self) -> bool {
        self.transcript.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::message::{MessageKind, SenderRole};

    #[test]
    fn test_new_session_has_welcome_only() {
        let session = Session::with_welcome("s1");
        assert_eq!(session.messages().len(), 1);
        let welcome = &session.messages()[0];
        assert_eq!(welcome.content, WELCOME_MESSAGE);
        assert_eq!(welcome.sender_role, SenderRole::Assistant);
        assert!(welcome.is_from_ai);
        assert_eq!(welcome.id, "msg-1");
    }

    #[test]
    fn test_append_preserves_order_and_assigns_ids() {
        let mut session = Session::with_welcome("s1");
        session.append_message(Message::user_text("one"));
        session.append_message(Message::assistant_text("two"));
        let messages = session.append_message(Message::user_text("three"));

        let contents: Vec<&str> = messages.iter().skip(1).map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["msg-1", "msg-2", "msg-3", "msg-4"]);
    }

    #[test]
    fn test_typing_placeholder_is_not_stored() {
        let mut session = Session::with_welcome("s1");
        let messages = session.append_message(Message::typing_placeholder());
        assert_eq!(messages.len(), 1);
        assert!(session
            .messages()
            .iter()
            .all(|m| m.kind != MessageKind::TypingPlaceholder));
    }

    #[test]
    fn test_starters_visibility() {
        let mut session = Session::with_welcome("s1");
        assert!(session.shows_conversation_starters());

        session.append_message(Message::user_text("hi"));
        session.append_message(Message::assistant_text("hello"));
        assert_eq!(session.messages().len(), 3);
        assert!(!session.shows_conversation_starters());
    }

    #[test]
    fn test_user_text_count_skips_hearts_and_images() {
        let mut session = Session::with_welcome("s1");
        assert_eq!(session.transcript.user_text_count(), 0);
        session.append_message(Message::user_text("a"));
        session.append_message(Message::heart());
        session.append_message(Message::image("https://cdn.example.com/a.png"));
        assert_eq!(session.transcript.user_text_count(), 1);
        assert_eq!(session.messages().len(), 4);
    }
}
