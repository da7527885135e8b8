//! Assistant chat use cases.
//!
//! - `view`: per-conversation state machine (`ChatView`)
//! - `snapshot`: render model (`ChatSnapshot`)
//! - `service`: wiring of registry, reply source and configuration (`ChatService`)

mod service;
mod snapshot;
mod view;

pub use service::ChatService;
pub use snapshot::{ChatSnapshot, INPUT_PLACEHOLDER};
pub use view::ChatView;
