//! Conversation starters and quick replies.
//!
//! Starters are offered in a fresh assistant chat; quick replies sit above
//! the input once it has been focused. Both are fixed, ordered lists.

use serde::{Deserialize, Serialize};

/// Leading decorations a conversation starter may carry.
pub const STARTER_ICONS: [char; 8] = ['🎯', '💡', '📈', '📊', '✨', '🤝', '📱', '🎨'];

const CONVERSATION_STARTERS: [&str; 8] = [
    "🎯 How do I get more followers?",
    "💡 Give me content ideas for this week",
    "📈 What hashtags should I use?",
    "📊 How do I read my insights?",
    "✨ How can I boost my engagement?",
    "🤝 How do I land brand collaborations?",
    "📱 When is the best time to post?",
    "🎨 Tips for making better reels",
];

const QUICK_REPLIES: [&str; 6] = [
    "Tell me more",
    "Give me an example",
    "What else?",
    "How do I start?",
    "Thanks! 🙏",
    "👍",
];

/// Fixed suggestion lists shown by the chat view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestions {
    /// Opening prompts, in display order.
    pub conversation_starters: Vec<String>,
    /// Short replies, in display order.
    pub quick_replies: Vec<String>,
}

impl Default for Suggestions {
    fn default() -> Self {
        Self {
            conversation_starters: conversation_starters(),
            quick_replies: quick_replies(),
        }
    }
}

impl Suggestions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the starter at a zero-based position.
    pub fn starter(&self, index: usize) -> Option<&str> {
        self.conversation_starters.get(index).map(String::as_str)
    }

    /// Gets the quick reply at a zero-based position.
    pub fn quick_reply(&self, index: usize) -> Option<&str> {
        self.quick_replies.get(index).map(String::as_str)
    }
}

/// Returns the builtin conversation starters.
pub fn conversation_starters() -> Vec<String> {
    CONVERSATION_STARTERS.iter().map(|s| s.to_string()).collect()
}

/// Returns the builtin quick replies.
pub fn quick_replies() -> Vec<String> {
    QUICK_REPLIES.iter().map(|s| s.to_string()).collect()
}

/// Strips a starter's leading icon so only the question is sent.
///
/// Text without a known icon is returned unchanged apart from trimming.
pub fn starter_prompt(starter: &str) -> String {
    let trimmed = starter.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) if STARTER_ICONS.contains(&first) => chars
            .as_str()
            .trim_start_matches('\u{FE0F}')
            .trim_start()
            .to_string(),
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions_are_idempotent() {
        assert_eq!(conversation_starters(), conversation_starters());
        assert_eq!(quick_replies(), quick_replies());
        assert_eq!(Suggestions::default(), Suggestions::new());
    }

    #[test]
    fn test_every_starter_has_an_icon() {
        for starter in conversation_starters() {
            let first = starter.chars().next().unwrap();
            assert!(STARTER_ICONS.contains(&first), "{}", starter);
        }
    }

    #[test]
    fn test_starter_prompt_strips_icon() {
        assert_eq!(starter_prompt("🎯 How do I get more followers?"), "How do I get more followers?");
        assert_eq!(starter_prompt("✨  Boost"), "Boost");
        assert_eq!(starter_prompt("  plain question "), "plain question");
        assert_eq!(starter_prompt("🙏 not a starter icon"), "🙏 not a starter icon");
    }

    #[test]
    fn test_indexed_lookup() {
        let suggestions = Suggestions::default();
        assert_eq!(suggestions.starter(0), Some("🎯 How do I get more followers?"));
        assert_eq!(suggestions.quick_reply(0), Some("Tell me more"));
        assert!(suggestions.starter(99).is_none());
    }
}
