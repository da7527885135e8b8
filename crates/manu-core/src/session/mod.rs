//! Session domain module.
//!
//! This module contains the assistant conversation model, its append-only
//! transcript, the chat view state, and the in-memory session registry.
//!
//! # Module Structure
//!
//! - `message`: Message types (`Message`, `SenderRole`, `MessageKind`)
//! - `model`: Session model (`Session`, `Transcript`)
//! - `view_state`: Chat view state (`ViewState`)
//! - `registry`: Session lifecycle management (`SessionRegistry`)
//!
//! # Usage
//!
//! ```ignore
//! use manu_core::session::{Session, SessionRegistry};
//! use manu_core::session::{Message, MessageKind, SenderRole};
//! ```

mod message;
mod model;
mod registry;
mod view_state;

// Re-export public API
pub use message::{Message, MessageKind, MessageStatus, SenderRole, display_timestamp};
pub use model::{Session, Transcript, WELCOME_MESSAGE};
pub use registry::SessionRegistry;
pub use view_state::ViewState;
