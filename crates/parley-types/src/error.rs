use thiserror::Error;

use crate::message::MessageId;

/// Errors surfaced by message operations.
///
/// A closed set: every boundary (HTTP, WebSocket) switches on these variants
/// explicitly to decide status codes and what detail is safe to expose.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// Missing, empty, or oversized fields.
    #[error("{message}")]
    Validation { message: String },

    /// No message with the requested id.
    #[error("message {id} not found")]
    NotFound { id: MessageId },

    /// A store constraint other than the primary key rejected the write.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Store or unexpected failure. `message` is safe to show clients,
    /// `detail` is for server logs and debug mode only.
    #[error("{message}")]
    Internal {
        code: &'static str,
        message: String,
        detail: String,
    },
}

impl MessageError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        MessageError::Validation {
            message: message.into(),
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            MessageError::Validation { .. } => "VALIDATION_ERROR",
            MessageError::NotFound { .. } => "MESSAGE_NOT_FOUND",
            MessageError::Conflict { .. } => "CONFLICT",
            MessageError::Internal { code, .. } => *code,
        }
    }

    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, MessageError::Internal { .. })
    }
}

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
