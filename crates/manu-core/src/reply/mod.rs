//! Rule-based assistant replies.
//!
//! The assistant is not a model call: replies come from an ordered keyword
//! topic table, and the chat view offers fixed conversation starters and
//! quick replies.

mod selector;
mod suggestions;
mod topic;

pub use selector::{ReplySelector, VariantPolicy};
pub use suggestions::{
    STARTER_ICONS, Suggestions, conversation_starters, quick_replies, starter_prompt,
};
pub use topic::{FALLBACK_RESPONSE, Topic, TopicTable};
