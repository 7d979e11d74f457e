use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Maximum username length, in characters, after trimming.
pub const MAX_USERNAME_CHARS: usize = 255;

/// Maximum message body length, in characters, after trimming.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Store-assigned message identifier.
///
/// Monotonically increasing and never reused, even after the row it named
/// has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A persisted chat message.
///
/// Owned by the store. Everything above the store only ever holds copies
/// returned by queries; no field changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    /// Display name of the sender (1..=255 characters, trimmed).
    pub username: String,
    /// Message body (1..=1000 characters, trimmed).
    pub message: String,
    /// Insert time assigned by the store; history is ordered by it.
    pub timestamp: DateTime<Utc>,
}

/// A validated, normalized message ready to be written to the store.
///
/// Only `MessageService` constructs these, after trimming and length checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub username: String,
    pub message: String,
}
