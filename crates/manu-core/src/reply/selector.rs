use super::suggestions::{self, Suggestions};
use super::topic::{Topic, TopicTable};
use crate::session::{Message, Session};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumString};

/// How a response is chosen among a topic's variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VariantPolicy {
    /// Always the first variant.
    First,
    /// Cycle through variants by how many user messages the session holds.
    #[default]
    Rotate,
    /// Uniformly random variant.
    Random,
}

/// Maps user input to a canned assistant reply.
///
/// Matching is done against an ordered [`TopicTable`]: the first topic with a
/// keyword contained in the input (ignoring case) wins, otherwise the table's
/// fallback is used. No network, no shared state.
#[derive(Debug, Clone)]
pub struct ReplySelector {
    table: Arc<TopicTable>,
    policy: VariantPolicy,
    suggestions: Suggestions,
}

impl Default for ReplySelector {
    fn default() -> Self {
        Self::new(Arc::new(TopicTable::default()), VariantPolicy::default())
    }
}

impl ReplySelector {
    pub fn new(table: Arc<TopicTable>, policy: VariantPolicy) -> Self {
        Self {
            table,
            policy,
            suggestions: Suggestions::default(),
        }
    }

    /// Produces the assistant's reply to `user_text`.
    ///
    /// Under [`VariantPolicy::Rotate`] the session history only affects which
    /// variant of the matched topic is used, never which topic matches.
    pub fn reply(&self, session: &Session, user_text: &str) -> Message {
        let content = match self.table.match_topic(user_text) {
            Some(topic) => {
                tracing::debug!("[ReplySelector] Matched topic '{}'", topic.name);
                self.pick_variant(topic, session)
                    .unwrap_or(self.table.fallback())
                    .to_string()
            }
            None => {
                tracing::debug!("[ReplySelector] No topic matched, using fallback");
                self.table.fallback().to_string()
            }
        };

        Message::assistant_text(content)
    }

    /// Exposes topic matching for inspection and tests.
    pub fn match_topic(&self, user_text: &str) -> Option<&Topic> {
        self.table.match_topic(user_text)
    }

    /// Opening prompts for a fresh conversation.
    pub fn conversation_starters(&self) -> Vec<String> {
        self.suggestions.conversation_starters.clone()
    }

    /// Short reply suggestions for the input field.
    pub fn quick_replies(&self) -> Vec<String> {
        self.suggestions.quick_replies.clone()
    }

    /// The prompt actually sent when a starter is picked.
    pub fn starter_prompt(&self, starter: &str) -> String {
        suggestions::starter_prompt(starter)
    }

    pub fn table(&self) -> &TopicTable {
        &self.table
    }

    pub fn policy(&self) -> VariantPolicy {
        self.policy
    }

    fn pick_variant<'a>(&self, topic: &'a Topic, session: &Session) -> Option<&'a str> {
        let variants = &topic.responses;
        let chosen = match self.policy {
            VariantPolicy::First => variants.first(),
            VariantPolicy::Rotate => {
                // The user's message is usually already committed when we get here.
                let sent = session.transcript.user_text_count().saturating_sub(1);
                variants.get(sent % variants.len().max(1))
            }
            VariantPolicy::Random => variants.choose(&mut rand::thread_rng()),
        };

        chosen.map(String::as_str)
    }
}
