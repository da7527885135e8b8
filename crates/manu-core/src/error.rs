//! Error types for the Manu assistant chat.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the assistant chat core.
///
/// Only [`ChatError::SessionNotFound`] can come out of the registry itself;
/// the remaining variants belong to the chat view, configuration loading and
/// topic table validation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatError {
    /// The session identifier is unknown to the registry.
    #[error("Session not found: '{id}'")]
    SessionNotFound { id: String },

    /// The assistant reply did not arrive before the configured timeout.
    #[error("Assistant reply timed out after {after_ms} ms")]
    ReplyTimeout { after_ms: u64 },

    /// The pending reply was abandoned because the chat view was closed.
    #[error("Assistant reply cancelled")]
    Cancelled,

    /// A message was sent while the previous reply is still pending.
    #[error("An assistant reply is already in flight")]
    ReplyInFlight,

    /// Topic table failed validation
    #[error("Invalid topic table: {0}")]
    InvalidTopicTable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a SessionNotFound error
    pub fn session_not_found(id: impl Into<String>) -> Self {
        Self::SessionNotFound { id: id.into() }
    }

    /// Creates a ReplyTimeout error
    pub fn reply_timeout(after_ms: u64) -> Self {
        Self::ReplyTimeout { after_ms }
    }

    /// Creates an InvalidTopicTable error
    pub fn invalid_topic_table(message: impl Into<String>) -> Self {
        Self::InvalidTopicTable(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a SessionNotFound error
    pub fn is_session_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound { .. })
    }

    /// Check if this is a ReplyTimeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ReplyTimeout { .. })
    }

    /// Check if this is a Cancelled error
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Returns true when the chat view should simply recreate its session.
    pub fn should_recreate_session(&self) -> bool {
        self.is_session_not_found()
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ChatError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ChatError>`.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_not_found_message() {
        let err = ChatError::session_not_found("abc");
        assert!(err.is_session_not_found());
        assert!(err.should_recreate_session());
        assert_eq!(err.to_string(), "Session not found: 'abc'");
    }

    #[test]
    fn test_timeout_is_not_recreate() {
        let err = ChatError::reply_timeout(500);
        assert!(err.is_timeout());
        assert!(!err.should_recreate_session());
        assert_eq!(err.to_string(), "Assistant reply timed out after 500 ms");
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("= broken");
        let err: ChatError = parse.unwrap_err().into();
        assert!(err.is_serialization());
    }
}
