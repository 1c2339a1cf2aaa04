//! Backend error types.
//!
//! Errors raised inside HTTP handlers, convertible to responses. The core
//! taxonomy (`ChatError`) folds in via `From`, so store and router
//! failures propagate with `?` and land on the right status code.

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::ChatError;

/// All failure modes of the HTTP surface.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler-level rejection with an explicit status
    #[error("{message}")]
    Handler {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Core messaging error (validation / persistence / serialization)
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Raw database error from the auth/user queries
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JWT creation or validation failure
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Password hashing failure
    #[error("Hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl BackendError {
    /// Create a handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Handler {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::CONFLICT, message)
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Handler { status, .. } => *status,
            Self::Chat(err) => match err {
                ChatError::Validation { .. } => StatusCode::BAD_REQUEST,
                ChatError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                ChatError::Serialization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Token(_) => StatusCode::UNAUTHORIZED,
            Self::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
