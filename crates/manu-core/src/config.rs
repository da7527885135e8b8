use crate::error::Result;
use crate::reply::{FALLBACK_RESPONSE, ReplySelector, Topic, TopicTable, VariantPolicy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default bound on how long the view waits for a reply.
pub const DEFAULT_REPLY_TIMEOUT_MS: u64 = 30_000;

/// Root of `config.toml`.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ChatConfig {
    /// Overrides the builtin fallback response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// Replaces the builtin topic table when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<Topic>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    /// How long a send may wait for the assistant reply.
    #[serde(default = "default_reply_timeout_ms")]
    pub reply_timeout_ms: u64,
    /// Simulated "typing" time before the reply is produced.
    #[serde(default)]
    pub typing_delay_ms: u64,
    #[serde(default)]
    pub variant_policy: VariantPolicy,
}

fn default_reply_timeout_ms() -> u64 {
    DEFAULT_REPLY_TIMEOUT_MS
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: default_reply_timeout_ms(),
            typing_delay_ms: 0,
            variant_policy: VariantPolicy::default(),
        }
    }
}

impl AssistantConfig {
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }

    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }
}

impl ChatConfig {
    /// Builds the topic table this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ChatError::InvalidTopicTable`] for malformed custom topics.
    pub fn topic_table(&self) -> Result<TopicTable> {
        let fallback = self
            .fallback
            .clone()
            .unwrap_or_else(|| FALLBACK_RESPONSE.to_string());

        if self.topics.is_empty() {
            TopicTable::new(TopicTable::builtin().topics().to_vec(), fallback)
        } else {
            TopicTable::new(self.topics.clone(), fallback)
        }
    }

    /// Builds a reply selector from this configuration.
    pub fn reply_selector(&self) -> Result<ReplySelector> {
        Ok(ReplySelector::new(
            Arc::new(self.topic_table()?),
            self.assistant.variant_policy,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config: ChatConfig = toml::from_str("").unwrap();
        assert_eq!(config, ChatConfig::default());
        assert_eq!(config.assistant.reply_timeout(), Duration::from_secs(30));
        assert_eq!(config.topic_table().unwrap(), *TopicTable::builtin());
    }

    #[test]
    fn test_custom_topics_and_fallback() {
        let toml_str = r#"
fallback = "Sorry, I only talk about pets."

[assistant]
reply_timeout_ms = 1500
typing_delay_ms = 200
variant_policy = "first"

[[topics]]
name = "pets"
keywords = ["Dog", "cat"]
responses = ["Pets are great!"]
"#;
        let config: ChatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.assistant.reply_timeout_ms, 1500);
        assert_eq!(config.assistant.typing_delay(), Duration::from_millis(200));
        assert_eq!(config.assistant.variant_policy, VariantPolicy::First);

        let table = config.topic_table().unwrap();
        assert_eq!(table.topics().len(), 1);
        assert_eq!(table.match_topic("my DOG").unwrap().name, "pets");
        assert_eq!(table.fallback(), "Sorry, I only talk about pets.");
        assert!(table.match_topic("followers").is_none());
    }

    #[test]
    fn test_invalid_custom_topic_is_rejected() {
        let toml_str = r#"
[[topics]]
name = "broken"
keywords = []
responses = ["x"]
"#;
        let config: ChatConfig = toml::from_str(toml_str).unwrap();
        assert!(config.reply_selector().is_err());
    }
}
