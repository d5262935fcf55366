//! Error types for the Intervue orchestrator.

use crate::collaborator::CollaboratorError;
use crate::session::InterviewPhase;
use thiserror::Error;

/// A shared error type for the interview orchestrator.
///
/// Every failure of a conversational turn is reported through one of these
/// variants; none of them is ever folded into a default reply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntervueError {
    /// The session id does not exist in the store.
    #[error("Session not found: '{id}'")]
    SessionNotFound { id: String },

    /// An answer was submitted after the interview completed.
    #[error("Session '{id}' is closed")]
    SessionClosed { id: String },

    /// An answer was submitted before the opening exchange ran.
    #[error("Session '{id}' has not started yet")]
    SessionNotStarted { id: String },

    /// The reasoning collaborator failed (transport, timeout, auth, status).
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// The collaborator answered, but not with the fields the schema requires.
    #[error("Malformed collaborator response for '{schema}': {message}")]
    MalformedResponse { schema: String, message: String },

    /// A phase change that the state machine does not allow.
    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition {
        from: InterviewPhase,
        to: InterviewPhase,
    },

    /// The operation is not available in the session's current phase.
    #[error("Operation requires phase {expected}, session is in {actual}")]
    InvalidPhase {
        expected: InterviewPhase,
        actual: InterviewPhase,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntervueError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn session_not_found(id: impl Into<String>) -> Self {
        Self::SessionNotFound { id: id.into() }
    }

    pub fn session_closed(id: impl Into<String>) -> Self {
        Self::SessionClosed { id: id.into() }
    }

    pub fn session_not_started(id: impl Into<String>) -> Self {
        Self::SessionNotStarted { id: id.into() }
    }

    /// Creates a MalformedResponse error for the given schema name.
    pub fn malformed(schema: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            schema: schema.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_session_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound { .. })
    }

    pub fn is_session_closed(&self) -> bool {
        matches!(self, Self::SessionClosed { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }

    pub fn is_collaborator(&self) -> bool {
        matches!(self, Self::Collaborator(_))
    }

    /// Whether resubmitting the same answer may succeed.
    ///
    /// Collaborator and malformed-response failures leave the session
    /// untouched, so the caller can resubmit. Lookup and phase errors cannot
    /// be fixed by retrying.
    pub fn is_resubmittable(&self) -> bool {
        matches!(self, Self::Collaborator(_) | Self::MalformedResponse { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for IntervueError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for IntervueError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for IntervueError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for IntervueError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, IntervueError>`.
pub type Result<T> = std::result::Result<T, IntervueError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_resubmittable_classification() {
        let timeout = IntervueError::from(CollaboratorError::Timeout(Duration::from_secs(30)));
        assert!(timeout.is_collaborator());
        assert!(timeout.is_resubmittable());

        let malformed = IntervueError::malformed("interview_turn", "missing field `text`");
        assert!(malformed.is_malformed());
        assert!(malformed.is_resubmittable());

        assert!(!IntervueError::session_not_found("abcd1234").is_resubmittable());
        assert!(!IntervueError::session_closed("abcd1234").is_resubmittable());
    }

    #[test]
    fn test_display_messages() {
        let err = IntervueError::InvalidTransition {
            from: InterviewPhase::Warmup,
            to: InterviewPhase::Intro,
        };
        assert_eq!(err.to_string(), "Invalid phase transition: WARMUP -> INTRO");
        assert_eq!(
            IntervueError::session_closed("1a2b3c4d").to_string(),
            "Session '1a2b3c4d' is closed"
        );
    }
}
