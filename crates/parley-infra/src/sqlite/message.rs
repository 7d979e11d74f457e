//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `parley-core` using sqlx with split
//! read/write pools. `id` and `timestamp` are assigned by SQLite on insert.

use chrono::{DateTime, Utc};
use parley_core::repository::message::MessageRepository;
use parley_types::error::RepositoryError;
use parley_types::message::{ChatMessage, MessageId, NewMessage};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ChatMessage.
struct MessageRow {
    id: i64,
    username: String,
    message: String,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            message: row.try_get("message")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        Ok(ChatMessage {
            id: MessageId(self.id),
            username: self.username,
            message: self.message,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<ChatMessage, RepositoryError> {
    MessageRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_message()
}

fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::Database(db_err)
            if db_err.message().contains("UNIQUE") || db_err.message().contains("CHECK") =>
        {
            RepositoryError::Conflict(db_err.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => RepositoryError::Connection,
        other => RepositoryError::Query(other.to_string()),
    }
}

impl MessageRepository for SqliteMessageRepository {
    async fn create(&self, message: &NewMessage) -> Result<ChatMessage, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO messages (username, message) VALUES (?, ?)
             RETURNING id, username, message, timestamp",
        )
        .bind(&message.username)
        .bind(&message.message)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        map_row(&row)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, username, message, timestamp FROM messages
             ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            messages.push(map_row(row)?);
        }

        Ok(messages)
    }

    async fn get_by_id(&self, id: MessageId) -> Result<Option<ChatMessage>, RepositoryError> {
        let row = sqlx::query("SELECT id, username, message, timestamp FROM messages WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn delete_by_id(&self, id: MessageId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }
}
