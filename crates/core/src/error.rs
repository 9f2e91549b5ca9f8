//! Error types for the AgentHub domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Every failure is a
//! synchronous return value; the HTTP layer maps variants to status codes
//! (validation → 400, unread-pending → 403, persistence → 500).

use thiserror::Error;

/// The top-level error type for all relay operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing input — the caller must fix the request and retry.
    #[error("{message}")]
    Validation { message: String },

    /// Send attempted while unread messages exist. A designed protocol
    /// signal, not a systemic failure: the caller should read first.
    #[error("You have unread messages. Please check messages first.")]
    UnreadPending { unread_count: usize, hint: String },

    /// Flushing the store to stable storage failed. The in-memory mutation
    /// was rolled back; nothing was committed.
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unread_pending_displays_protocol_message() {
        let err = Error::UnreadPending {
            unread_count: 3,
            hint: "GET /api/messages?channel=proj&agent=bot".into(),
        };
        assert!(err.to_string().contains("unread messages"));
    }

    #[test]
    fn validation_error_carries_message() {
        let err = Error::validation("Missing channel parameter");
        assert_eq!(err.to_string(), "Missing channel parameter");
    }
}
