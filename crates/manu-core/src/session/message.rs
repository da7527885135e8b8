//! Chat message types.
//!
//! This module contains the closed set of sender roles and message kinds,
//! and the immutable [`Message`] value stored in a session transcript.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SenderRole {
    /// Message from the user.
    User,
    /// Message from the assistant.
    Assistant,
}

/// What a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Plain text.
    Text,
    /// An image; `content` holds its URL.
    Image,
    /// A heart reaction sent as its own message.
    Heart,
    /// The "assistant is typing" bubble. Render-only; never committed to a transcript.
    TypingPlaceholder,
}

/// Delivery state of a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Read,
}

impl MessageStatus {
    /// Check marks shown next to the timestamp.
    pub fn check_marks(self) -> &'static str {
        match self {
            MessageStatus::Sent => "✓",
            MessageStatus::Delivered | MessageStatus::Read => "✓✓",
        }
    }
}

/// A single message in a conversation.
///
/// Messages are immutable once appended to a transcript. The `id` is assigned
/// by the transcript on append and is unique within its session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier, unique within the owning session.
    pub id: String,
    /// The sender of the message.
    pub sender_role: SenderRole,
    /// The content of the message.
    pub content: String,
    /// Display timestamp, e.g. "2:30 PM".
    pub timestamp: String,
    /// The kind of payload.
    pub kind: MessageKind,
    /// Set on assistant messages produced by the reply selector.
    #[serde(default)]
    pub is_from_ai: bool,
    /// Delivery state; only user messages carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
    /// Emoji reactions attached before the message was committed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<String>,
}

impl Message {
    /// Creates a text message from the user, stamped with the current local time.
    pub fn user_text(content: impl Into<String>) -> Self {
        Self::new(SenderRole::User, MessageKind::Text, content, false)
    }

    /// Creates an AI-tagged text message from the assistant.
    pub fn assistant_text(content: impl Into<String>) -> Self {
        Self::new(SenderRole::Assistant, MessageKind::Text, content, true)
    }

    /// Creates a heart reaction from the user.
    pub fn heart() -> Self {
        Self::new(SenderRole::User, MessageKind::Heart, "❤️", false)
    }

    /// Creates an image message from the user; `url` is stored as the content.
    pub fn image(url: impl Into<String>) -> Self {
        Self::new(SenderRole::User, MessageKind::Image, url, false)
    }

    /// Creates the transient typing bubble shown while a reply is pending.
    pub fn typing_placeholder() -> Self {
        Self::new(SenderRole::Assistant, MessageKind::TypingPlaceholder, "", true)
    }

    fn new(
        sender_role: SenderRole,
        kind: MessageKind,
        content: impl Into<String>,
        is_from_ai: bool,
    ) -> Self {
        Self {
            id: String::new(),
            sender_role,
            content: content.into(),
            timestamp: display_timestamp(&Local::now()),
            kind,
            is_from_ai,
            status: (sender_role == SenderRole::User).then_some(MessageStatus::Sent),
            reactions: Vec::new(),
        }
    }

    /// Replaces the delivery state.
    pub fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Adds a reaction.
    pub fn with_reaction(mut self, reaction: impl Into<String>) -> Self {
        self.reactions.push(reaction.into());
        self
    }

    /// Check marks to render, empty for assistant messages.
    pub fn status_marks(&self) -> &'static str {
        match (self.sender_role, self.status) {
            (SenderRole::User, Some(status)) => status.check_marks(),
            _ => "",
        }
    }

    /// Whether this is a user text message, the only kind that asks the
    /// assistant something.
    pub fn is_user_text(&self) -> bool {
        self.sender_role == SenderRole::User && self.kind == MessageKind::Text
    }

    /// Whether the message belongs in a transcript.
    pub fn is_committable(&self) -> bool {
        self.kind != MessageKind::TypingPlaceholder
    }

    pub fn is_from_user(&self) -> bool {
        self.sender_role == SenderRole::User
    }
}

/// Formats a time the way chat bubbles show it ("2:30 PM").
pub fn display_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%-I:%M %p").to_string()
}
