//! Message service.
//!
//! Validates and normalizes chat payloads, delegates to the repository, and
//! classifies repository failures. Both ingress surfaces (REST and WebSocket)
//! go through this service, so they share one set of rules.

use parley_types::error::{MessageError, RepositoryError};
use parley_types::message::{
    ChatMessage, MAX_MESSAGE_CHARS, MAX_USERNAME_CHARS, MessageId, NewMessage,
};

use crate::repository::message::MessageRepository;

/// Default page size for `list` when none is requested.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Largest page `list` will ever return.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Service owning the message use cases.
///
/// Generic over the repository to maintain clean architecture --
/// parley-core never depends on parley-infra.
pub struct MessageService<R: MessageRepository> {
    repo: R,
}

impl<R: MessageRepository> MessageService<R> {
    /// Create a new MessageService backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Validate, normalize, and persist a new message.
    ///
    /// Exactly one row is written on success; nothing is written when
    /// validation fails.
    pub async fn create(&self, username: &str, message: &str) -> Result<ChatMessage, MessageError> {
        let new_message = validate_new_message(username, message)?;

        let saved = self.repo.create(&new_message).await.map_err(|e| match e {
            RepositoryError::Conflict(msg) => MessageError::Conflict { message: msg },
            other => internal("MESSAGE_CREATION_ERROR", "Failed to create message", other),
        })?;

        tracing::debug!(message_id = %saved.id, username = %saved.username, "Message created");
        Ok(saved)
    }

    /// List messages newest first.
    ///
    /// `limit` defaults to 50 and is clamped to 1..=100; `offset` defaults to
    /// 0 and negative values are treated as 0.
    pub async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ChatMessage>, MessageError> {
        let limit = clamp_limit(limit);
        let offset = offset.unwrap_or(0).max(0);

        self.repo
            .list(limit, offset)
            .await
            .map_err(|e| internal("MESSAGES_FETCH_ERROR", "Failed to fetch messages", e))
    }

    /// Get a single message.
    pub async fn get_by_id(&self, id: MessageId) -> Result<ChatMessage, MessageError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| internal("MESSAGE_FETCH_ERROR", "Failed to fetch message", e))?
            .ok_or(MessageError::NotFound { id })
    }

    /// Delete a message. Returns `false` (not an error) if it does not exist.
    pub async fn delete_by_id(&self, id: MessageId) -> Result<bool, MessageError> {
        let deleted = self
            .repo
            .delete_by_id(id)
            .await
            .map_err(|e| internal("MESSAGE_DELETION_ERROR", "Failed to delete message", e))?;

        if deleted {
            tracing::info!(message_id = %id, "Message deleted");
        }
        Ok(deleted)
    }

    /// Number of stored messages.
    pub async fn count(&self) -> Result<i64, MessageError> {
        self.repo
            .count()
            .await
            .map_err(|e| internal("MESSAGES_FETCH_ERROR", "Failed to count messages", e))
    }
}

/// Trim and check a chat payload.
///
/// Lengths are measured in characters after trimming surrounding whitespace.
pub fn validate_new_message(username: &str, message: &str) -> Result<NewMessage, MessageError> {
    let username = username.trim();
    let message = message.trim();

    if username.is_empty() || message.is_empty() {
        return Err(MessageError::validation("Username and message are required"));
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(MessageError::validation("Username is too long"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(MessageError::validation("Message is too long"));
    }

    Ok(NewMessage {
        username: username.to_string(),
        message: message.to_string(),
    })
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

/// Wrap an unexpected repository failure. Full detail goes to the log only.
fn internal(code: &'static str, message: &str, source: RepositoryError) -> MessageError {
    tracing::error!(code, error = %source, "{message}");
    MessageError::Internal {
        code,
        message: message.to_string(),
        detail: source.to_string(),
    }
}
