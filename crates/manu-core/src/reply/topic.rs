//! Keyword topic table used by the reply selector.
//!
//! The table is an ordered list of `(keywords -> responses)` entries. The
//! builtin table is initialized once on first access and cached for the
//! lifetime of the process; a custom table can be supplied through
//! configuration.

use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Response used when no topic matches.
pub const FALLBACK_RESPONSE: &str = "That's a great question! I'm best at helping with growing your \
followers, content ideas, hashtags, engagement, posting times, analytics, reels and brand \
collaborations. Could you tell me a bit more about what you're trying to achieve?";

/// One topic: any keyword selects one of the responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Topic name (e.g. "followers")
    pub name: String,
    /// Lowercase keywords matched as substrings
    pub keywords: Vec<String>,
    /// Response variants
    pub responses: Vec<String>,
}

impl Topic {
    /// Creates a topic. Keywords are lowercased.
    pub fn new<K, R>(name: impl Into<String>, keywords: K, responses: R) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether any keyword occurs in `lowered`, which must already be lowercase.
    fn matches_lowered(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Ordered topic table plus its fallback response.
///
/// Deserialization goes through [`TopicTable::new`], so a decoded table is
/// validated like a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTopicTable")]
pub struct TopicTable {
    topics: Vec<Topic>,
    fallback: String,
}

#[derive(Deserialize)]
struct RawTopicTable {
    topics: Vec<Topic>,
    fallback: String,
}

impl TryFrom<RawTopicTable> for TopicTable {
    type Error = ChatError;

    fn try_from(raw: RawTopicTable) -> Result<Self> {
        TopicTable::new(raw.topics, raw.fallback)
    }
}

impl TopicTable {
    /// Builds a validated table.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidTopicTable`] if a topic has no keywords, an
    /// empty keyword, or no responses, or if the fallback is blank.
    pub fn new(topics: Vec<Topic>, fallback: impl Into<String>) -> Result<Self> {
        let fallback = fallback.into();
        if fallback.trim().is_empty() {
            return Err(ChatError::invalid_topic_table("fallback response is empty"));
        }

        let mut normalized = Vec::with_capacity(topics.len());
        for topic in topics {
            if topic.keywords.is_empty() {
                return Err(ChatError::invalid_topic_table(format!(
                    "topic '{}' has no keywords",
                    topic.name
                )));
            }
            if topic.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(ChatError::invalid_topic_table(format!(
                    "topic '{}' has an empty keyword",
                    topic.name
                )));
            }
            if topic.responses.is_empty() {
                return Err(ChatError::invalid_topic_table(format!(
                    "topic '{}' has no responses",
                    topic.name
                )));
            }
            normalized.push(Topic::new(topic.name, topic.keywords, topic.responses));
        }

        Ok(Self {
            topics: normalized,
            fallback,
        })
    }

    /// Returns the builtin table.
    pub fn builtin() -> &'static TopicTable {
        static BUILTIN_TABLE: OnceLock<TopicTable> = OnceLock::new();
        BUILTIN_TABLE.get_or_init(|| TopicTable {
            topics: builtin_topics(),
            fallback: FALLBACK_RESPONSE.to_string(),
        })
    }

    /// Returns the first topic with a keyword contained in `text`,
    /// ignoring case.
    pub fn match_topic(&self, text: &str) -> Option<&Topic> {
        let lowered = text.to_lowercase();
        self.topics.iter().find(|t| t.matches_lowered(&lowered))
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Find a topic by name.
    pub fn find(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }
}

impl Default for TopicTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn builtin_topics() -> Vec<Topic> {
    vec![
        Topic::new(
            "followers",
            ["follower", "grow", "audience", "reach more people"],
            [
                "Growing your followers comes down to consistency and community. Post 3-5 times a week, \
reply to every comment in the first hour, and engage with 10-15 accounts in your niche each day.",
                "To grow your audience, nail down your niche first. Accounts with a clear focus grow faster \
because people know exactly what they get when they follow you. Optimize your bio and pin your best posts.",
                "Collaborations are one of the fastest ways to gain followers. Partner with creators of a \
similar size for joint lives, shared reels or giveaways to reach their audience.",
            ],
        ),
        Topic::new(
            "content_ideas",
            ["content", "idea", "what should i post", "inspiration", "creative"],
            [
                "Here are some content ideas that work well: behind-the-scenes clips, before/after \
transformations, quick tutorials, day-in-the-life stories and answering your followers' questions.",
                "Try the 80/20 rule: 80% of your posts should educate, entertain or inspire, and only 20% \
should promote. Carousels with practical tips get saved and shared a lot.",
                "Repurpose what already works! Turn a popular post into a reel, a reel into a carousel, \
and a carousel into a series of stories.",
            ],
        ),
        Topic::new(
            "hashtags",
            ["hashtag", "#", "tags"],
            [
                "Use a mix of 5-10 hashtags: a few broad ones, several niche ones and one or two branded \
tags. Niche hashtags with 10k-500k posts usually give the best discoverability.",
                "Rotate your hashtag sets instead of reusing the same block every time, and put them at \
the end of your caption so the caption stays readable.",
            ],
        ),
        Topic::new(
            "engagement",
            ["engag", "likes", "comment", "interaction", "saves", "share"],
            [
                "To boost engagement, end captions with a question, use interactive stickers like polls \
and quizzes in stories, and reply to comments quickly. The algorithm rewards early interaction.",
                "Saves and shares matter more than likes. Create posts people want to come back to, like \
checklists, guides and step-by-step tips.",
            ],
        ),
        Topic::new(
            "posting_schedule",
            ["when to post", "best time", "schedule", "how often", "posting time"],
            [
                "The best times are usually 11am-1pm and 7-9pm on weekdays, but check your own insights \
to see when your followers are most active and schedule around that.",
                "Consistency beats frequency. Pick a schedule you can keep, for example 4 posts and daily \
stories per week, and stick to it for at least a month before changing it.",
            ],
        ),
        Topic::new(
            "analytics",
            ["analytic", "insight", "metric", "stats", "statistic", "performance"],
            [
                "Focus on reach, saves, shares and profile visits. Compare each post against your average \
instead of chasing single numbers, and double down on formats that beat it.",
                "Check your insights weekly: look at which posts brought new followers and what time your \
audience is online. Those two numbers should drive your content plan.",
            ],
        ),
        Topic::new(
            "reels",
            ["reel", "video", "viral", "trend"],
            [
                "For reels, hook viewers in the first 2 seconds, keep them under 30 seconds, use trending \
audio and add text overlays since many people watch without sound.",
                "Jump on trends early but give them your own twist. Reels that fit your niche convert \
viewers into followers much better than generic trend copies.",
            ],
        ),
        Topic::new(
            "collaborations",
            ["collab", "brand", "sponsor", "partner", "monetiz", "influencer"],
            [
                "Brands look at engagement rate more than follower count. Build a simple media kit with \
your niche, audience demographics and best results, then pitch brands you already use.",
                "Start with micro-collaborations: product swaps with small brands or joint content with \
creators in your niche. They build your portfolio for bigger sponsorships later.",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_initialized() {
        let table = TopicTable::builtin();
        assert!(!table.topics().is_empty());
        assert!(table.find("followers").is_some());
        assert!(table.topics().iter().all(|t| !t.responses.is_empty()));
        assert_eq!(table.fallback(), FALLBACK_RESPONSE);
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let table = TopicTable::builtin();
        for text in [
            "How do I get more followers?",
            "FOLLOWERS please",
            "my Follower count is stuck",
        ] {
            assert_eq!(table.match_topic(text).map(|t| t.name.as_str()), Some("followers"));
        }
    }

    #[test]
    fn test_first_match_wins() {
        // "grow" (followers) is listed before "content" (content_ideas)
        let table = TopicTable::builtin();
        let topic = table.match_topic("content to grow my page").unwrap();
        assert_eq!(topic.name, "followers");
    }

    #[test]
    fn test_no_match() {
        assert!(TopicTable::builtin().match_topic("asdkjalksjd").is_none());
    }

    #[test]
    fn test_validation_rejects_bad_topics() {
        let no_keywords = TopicTable::new(
            vec![Topic::new("empty", Vec::<String>::new(), ["r"])],
            "fallback",
        );
        assert!(matches!(no_keywords, Err(ChatError::InvalidTopicTable(_))));

        let no_responses = TopicTable::new(
            vec![Topic::new("mute", ["k"], Vec::<String>::new())],
            "fallback",
        );
        assert!(no_responses.is_err());

        assert!(TopicTable::new(vec![], "  ").is_err());
    }

    #[test]
    fn test_custom_table_lowercases_keywords() {
        let table = TopicTable::new(
            vec![Topic {
                name: "pets".to_string(),
                keywords: vec!["DOG".to_string()],
                responses: vec!["Woof".to_string()],
            }],
            "fallback",
        )
        .unwrap();

        assert_eq!(table.match_topic("my dog").unwrap().name, "pets");
        assert_eq!(table.topics()[0].keywords, vec!["dog".to_string()]);
    }

    #[test]
    fn test_deserialized_table_is_validated() {
        let empty_keyword = r#"{"topics":[{"name":"all","keywords":[""],"responses":["x"]}],"fallback":"f"}"#;
        let err = serde_json::from_str::<TopicTable>(empty_keyword).unwrap_err();
        assert!(err.to_string().contains("empty keyword"));

        let valid = r#"{"topics":[{"name":"pets","keywords":["DOG"],"responses":["Woof"]}],"fallback":"f"}"#;
        let table: TopicTable = serde_json::from_str(valid).unwrap();
        assert_eq!(table.topics()[0].keywords, vec!["dog".to_string()]);
        assert!(table.match_topic("anything else").is_none());
    }
}
