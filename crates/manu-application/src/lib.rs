//! Application layer for the Manu assistant chat.
//!
//! This crate drives the domain types from `manu-core`: it owns the chat view
//! state machine (send, typing indicator, timeout, cancellation) and the
//! service that wires a registry and a reply source together.

pub mod chat;
pub mod reply_source;

pub use chat::{ChatService, ChatSnapshot, ChatView, INPUT_PLACEHOLDER};
pub use reply_source::{CannedReplySource, ReplySource};
