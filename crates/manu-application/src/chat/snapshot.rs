use manu_core::session::Message;
use serde::Serialize;

/// Input placeholder of the assistant chat.
pub const INPUT_PLACEHOLDER: &str = "Ask me anything...";

/// Render model of a [`ChatView`](super::ChatView) at one point in time.
///
/// Suggestion lists are already filtered by visibility: starters are empty
/// once the conversation has started, quick replies are empty unless the
/// input is focused.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    pub session_id: String,
    /// Committed messages in display order
    pub messages: Vec<Message>,
    /// Whether the typing indicator is shown
    pub is_typing: bool,
    /// Visible conversation starters
    pub conversation_starters: Vec<String>,
    /// Visible quick replies
    pub quick_replies: Vec<String>,
}

impl ChatSnapshot {
    /// Messages to draw, with a trailing typing bubble while a reply is pending.
    pub fn display_messages(&self) -> Vec<Message> {
        let mut items = self.messages.clone();
        if self.is_typing {
            items.push(Message::typing_placeholder());
        }
        items
    }

    pub fn input_placeholder(&self) -> &'static str {
        INPUT_PLACEHOLDER
    }
}
