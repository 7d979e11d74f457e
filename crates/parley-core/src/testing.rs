//! In-memory repository used by the service and gateway tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use parley_types::error::RepositoryError;
use parley_types::message::{ChatMessage, MessageId, NewMessage};

use crate::repository::message::MessageRepository;

/// Vec-backed store with switchable read/write failures.
pub struct InMemoryMessageRepository {
    rows: Mutex<Vec<ChatMessage>>,
    next_id: AtomicI64,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<(), RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("read failure".to_string()));
        }
        Ok(())
    }
}

impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: &NewMessage) -> Result<ChatMessage, RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("write failure".to_string()));
        }
        let row = ChatMessage {
            id: MessageId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            username: message.username.clone(),
            message: message.message.clone(),
            timestamp: chrono::Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.check_reads()?;
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn get_by_id(&self, id: MessageId) -> Result<Option<ChatMessage>, RepositoryError> {
        self.check_reads()?;
        Ok(self.rows.lock().unwrap().iter().find(|m| m.id == id).cloned())
    }

    async fn delete_by_id(&self, id: MessageId) -> Result<bool, RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("write failure".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| m.id != id);
        Ok(rows.len() != before)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        self.check_reads()?;
        Ok(self.rows.lock().unwrap().len() as i64)
    }
}
