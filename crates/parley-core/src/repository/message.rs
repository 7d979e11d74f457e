//! Message repository trait definition.

use parley_types::error::RepositoryError;
use parley_types::message::{ChatMessage, MessageId, NewMessage};

/// Repository trait for message persistence: a durable, ordered record.
///
/// The store assigns `id` and `timestamp` on insert. Listing is always
/// newest first (`timestamp` descending, `id` breaking ties).
///
/// Implementations live in parley-infra (e.g., SqliteMessageRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait MessageRepository: Send + Sync {
    /// Insert a message. Returns the stored row with its assigned id and timestamp.
    fn create(
        &self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// List messages newest first.
    fn list(
        &self,
        limit: i64,
        offset: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Get a message by its id.
    fn get_by_id(
        &self,
        id: MessageId,
    ) -> impl std::future::Future<Output = Result<Option<ChatMessage>, RepositoryError>> + Send;

    /// Delete a message by id. Returns `false` if no row matched.
    fn delete_by_id(
        &self,
        id: MessageId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Total number of stored messages.
    fn count(&self) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
