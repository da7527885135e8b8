//! Domain core of the Manu assistant chat.
//!
//! - [`session`]: messages, the append-only transcript and the session registry
//! - [`reply`]: topic table, reply selection, starters and quick replies
//! - [`config`]: `config.toml` model
//! - [`error`]: [`ChatError`]
//! - [`backend`]: API for the host UI. Its auth, profile and post calls go to
//!   the hosted backend, and it classifies the errors from those calls with
//!   [`backend::classify`] to choose a message and a [`backend::RecoveryAction`].
//!   The chat itself makes no backend calls.

pub mod backend;
pub mod config;
pub mod error;
pub mod reply;
pub mod session;

// Re-export common error type
pub use error::ChatError;
