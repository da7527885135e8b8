//! Classification of errors reported by the hosted backend.
//!
//! Authentication, profile storage and post persistence live in a hosted
//! backend-as-a-service. Its errors arrive as a code plus a raw message.
//! Instead of showing that raw text, callers classify it and pick a recovery
//! action per class.
//!
//! Nothing in this workspace talks to the backend; the host UI calls into
//! this module for its auth and profile screens.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// "No rows returned" from the backend's REST layer.
pub const CODE_NO_ROWS: &str = "PGRST116";
/// Insufficient privilege, typically a row-level-security policy rejection.
pub const CODE_INSUFFICIENT_PRIVILEGE: &str = "42501";
/// Unique constraint violation.
pub const CODE_UNIQUE_VIOLATION: &str = "23505";
/// NOT NULL constraint violation.
pub const CODE_NOT_NULL_VIOLATION: &str = "23502";

/// An error as reported by the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendError {
    /// Backend error code (SQLSTATE or REST error code), if any.
    #[serde(default)]
    pub code: Option<String>,
    /// Raw message from the backend.
    pub message: String,
}

impl BackendError {
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// Classifies this error. See [`BackendErrorClass`].
    pub fn class(&self) -> BackendErrorClass {
        classify(self.code.as_deref(), &self.message)
    }

    /// Returns a message suitable for display instead of the raw backend text.
    pub fn user_message(&self) -> String {
        match self.class() {
            BackendErrorClass::Validation => {
                "Some of the information you entered is invalid.".to_string()
            }
            BackendErrorClass::Conflict => "That entry already exists.".to_string(),
            BackendErrorClass::Authorization => {
                "You don't have permission to do that.".to_string()
            }
            BackendErrorClass::NotFound => "We couldn't find what you were looking for.".to_string(),
            BackendErrorClass::Transient => {
                "Connection problem. Please try again in a moment.".to_string()
            }
            BackendErrorClass::Unknown => format!("Something went wrong: {}", self.message),
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for BackendError {}

/// Broad class of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BackendErrorClass {
    /// The request carried invalid data.
    Validation,
    /// The row already exists.
    Conflict,
    /// Authentication or row-level-security rejection.
    Authorization,
    /// The requested row does not exist.
    NotFound,
    /// Network or availability problem; retrying may succeed.
    Transient,
    Unknown,
}

impl BackendErrorClass {
    /// The recovery action the UI should offer for this class.
    pub fn recovery_action(self) -> RecoveryAction {
        match self {
            Self::Validation => RecoveryAction::FixInput,
            Self::Conflict => RecoveryAction::FixInput,
            Self::Authorization => RecoveryAction::SignIn,
            Self::NotFound => RecoveryAction::Recreate,
            Self::Transient => RecoveryAction::Retry,
            Self::Unknown => RecoveryAction::Report,
        }
    }

    /// Whether retrying the same request unchanged may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Transient)
    }
}

/// What the user (or the calling code) should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    FixInput,
    SignIn,
    Recreate,
    Retry,
    Report,
}

/// Classifies a backend error from its code and message.
///
/// Codes take precedence over message text. Message matching is
/// case-insensitive.
pub fn classify(code: Option<&str>, message: &str) -> BackendErrorClass {
    if let Some(code) = code {
        match code {
            CODE_NO_ROWS => return BackendErrorClass::NotFound,
            CODE_INSUFFICIENT_PRIVILEGE => return BackendErrorClass::Authorization,
            CODE_UNIQUE_VIOLATION => return BackendErrorClass::Conflict,
            CODE_NOT_NULL_VIOLATION => return BackendErrorClass::Validation,
            // SQLSTATE class 22: data exception
            c if c.starts_with("22") => return BackendErrorClass::Validation,
            // HTTP-style 5xx codes
            c if c.len() == 3 && c.starts_with('5') && c.chars().all(|ch| ch.is_ascii_digit()) => {
                return BackendErrorClass::Transient;
            }
            _ => {}
        }
    }

    let lower = message.to_lowercase();
    if lower.contains("row-level security")
        || lower.contains("security policy")
        || lower.contains("permission denied")
        || lower.contains("invalid login credentials")
        || lower.contains("jwt expired")
    {
        BackendErrorClass::Authorization
    } else if lower.contains("already") || lower.contains("duplicate key") {
        BackendErrorClass::Conflict
    } else if lower.contains("failed to fetch")
        || lower.contains("network")
        || lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("service unavailable")
    {
        BackendErrorClass::Transient
    } else if lower.contains("invalid") || lower.contains("required") || lower.contains("too short") {
        BackendErrorClass::Validation
    } else if lower.contains("not found") || lower.contains("no rows") {
        BackendErrorClass::NotFound
    } else {
        BackendErrorClass::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_take_precedence() {
        assert_eq!(
            classify(Some("42501"), "new row violates row-level security policy"),
            BackendErrorClass::Authorization
        );
        assert_eq!(classify(Some("23505"), "whatever"), BackendErrorClass::Conflict);
        assert_eq!(classify(Some("PGRST116"), "JSON object requested"), BackendErrorClass::NotFound);
        assert_eq!(classify(Some("22P02"), "bad uuid"), BackendErrorClass::Validation);
        assert_eq!(classify(Some("503"), ""), BackendErrorClass::Transient);
    }

    #[test]
    fn test_message_fallbacks() {
        assert_eq!(
            classify(None, "Invalid login credentials"),
            BackendErrorClass::Authorization
        );
        assert_eq!(classify(None, "Username already taken"), BackendErrorClass::Conflict);
        assert_eq!(classify(None, "TypeError: Failed to fetch"), BackendErrorClass::Transient);
        assert_eq!(classify(None, "Password is too short"), BackendErrorClass::Validation);
        assert_eq!(classify(None, "kaboom"), BackendErrorClass::Unknown);
    }

    #[test]
    fn test_recovery_actions() {
        assert_eq!(BackendErrorClass::Transient.recovery_action(), RecoveryAction::Retry);
        assert_eq!(BackendErrorClass::Authorization.recovery_action(), RecoveryAction::SignIn);
        assert!(BackendErrorClass::Transient.is_retryable());
        assert!(!BackendErrorClass::Conflict.is_retryable());
    }

    #[test]
    fn test_user_message_hides_raw_text_for_known_classes() {
        let err = BackendError::new(Some("42501"), "new row violates row-level security policy for table \"profiles\"");
        assert!(!err.user_message().contains("profiles"));
        assert_eq!(err.to_string(), "[42501] new row violates row-level security policy for table \"profiles\"");
    }
}
