//! Interaction state of a chat view.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Where a chat view is in its send/reply cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ViewState {
    /// No reply pending; the user may send.
    #[default]
    Idle,
    /// The user's message is committed and the assistant reply is in flight.
    /// The typing indicator is shown in this state.
    AwaitingReply,
}

impl ViewState {
    pub fn is_typing(self) -> bool {
        matches!(self, ViewState::AwaitingReply)
    }
}
