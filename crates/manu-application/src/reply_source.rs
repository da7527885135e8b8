use async_trait::async_trait;
use manu_core::reply::ReplySelector;
use manu_core::session::{Message, Session};
use std::time::Duration;

/// Produces assistant replies for a chat view.
///
/// This is the only suspension point of a send. The builtin implementation is
/// the canned [`ReplySelector`]; other implementations can simulate latency or
/// stand in for a remote model.
#[async_trait]
pub trait ReplySource: Send + Sync {
    /// Generates the reply to `user_text`. `session` already contains the
    /// user's message.
    async fn generate(&self, session: &Session, user_text: &str) -> Message;

    /// Opening prompts offered in a fresh conversation.
    fn conversation_starters(&self) -> Vec<String> {
        manu_core::reply::conversation_starters()
    }

    /// Short replies offered above the input.
    fn quick_replies(&self) -> Vec<String> {
        manu_core::reply::quick_replies()
    }

    /// The text actually sent when a starter is picked.
    fn starter_prompt(&self, starter: &str) -> String {
        manu_core::reply::starter_prompt(starter)
    }
}

/// Reply source backed by the keyword topic table.
///
/// An optional typing delay makes the typing indicator visible before the
/// reply lands, as a person typing would.
pub struct CannedReplySource {
    /// Topic matcher
    selector: ReplySelector,
    /// Simulated typing time
    typing_delay: Duration,
}

impl CannedReplySource {
    /// Creates a new CannedReplySource.
    ///
    /// # Arguments
    ///
    /// * `selector` - Topic matcher used to pick replies
    /// * `typing_delay` - Time to wait before replying (zero for none)
    pub fn new(selector: ReplySelector, typing_delay: Duration) -> Self {
        Self {
            selector,
            typing_delay,
        }
    }

    pub fn selector(&self) -> &ReplySelector {
        &self.selector
    }
}

impl Default for CannedReplySource {
    fn default() -> Self {
        Self::new(ReplySelector::default(), Duration::ZERO)
    }
}

#[async_trait]
impl ReplySource for CannedReplySource {
    async fn generate(&self, session: &Session, user_text: &str) -> Message {
        if !self.typing_delay.is_zero() {
            tokio::time::sleep(self.typing_delay).await;
        }
        self.selector.reply(session, user_text)
    }

    fn conversation_starters(&self) -> Vec<String> {
        self.selector.conversation_starters()
    }

    fn quick_replies(&self) -> Vec<String> {
        self.selector.quick_replies()
    }

    fn starter_prompt(&self, starter: &str) -> String {
        self.selector.starter_prompt(starter)
    }
}
