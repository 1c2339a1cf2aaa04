//! Shared Error Types
//!
//! The error taxonomy of the messaging core, shared between the store, the
//! router, and the HTTP boundary.
//!
//! # Error Categories
//!
//! - `Validation` - malformed or incomplete submission; nothing persisted
//! - `Persistence` - the underlying store is unavailable or rejected a write
//! - `Serialization` - JSON encode/decode failures at the wire boundary
//!
//! Recipient-offline is deliberately NOT an error: a delivery miss is
//! ordinary behavior and the message stays retrievable via history fetch.
//!
//! # Thread Safety
//!
//! All error types are `Send + Sync` and can be safely shared across thread
//! boundaries.
use thiserror::Error;

/// Errors surfaced by the messaging core. Every variant is local to the
/// submission or query that raised it; none are fatal to the server.
#[derive(Debug, Error, Clone)]
pub enum ChatError {
    /// Malformed or incomplete input
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// The durable store failed the operation
    #[error("Persistence error: {message}")]
    Persistence {
        /// Human-readable error message
        message: String,
    },

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Human-readable error message
        message: String,
    },
}

impl ChatError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = ChatError::validation("receiver", "receiver is required");
        match error {
            ChatError::Validation { field, message } => {
                assert_eq!(field, "receiver");
                assert_eq!(message, "receiver is required");
            }
            _ => panic!("Expected Validation"),
        }
    }

    #[test]
    fn test_persistence_error_display() {
        let error = ChatError::persistence("connection refused");
        let display = format!("{}", error);
        assert!(display.contains("Persistence error"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn test_from_serde_error() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let error: ChatError = result.unwrap_err().into();
        match error {
            ChatError::Serialization { .. } => {}
            _ => panic!("Expected Serialization from serde error"),
        }
    }
}
