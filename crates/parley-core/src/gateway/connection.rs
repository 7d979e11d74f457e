//! Per-connection bookkeeping for the realtime gateway.

use std::fmt;

use chrono::{DateTime, Utc};
use parley_types::event::ServerEvent;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Sending half of a connection's outbox. A writer task owned by the
/// transport drains the other half into the socket.
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

/// Unique identifier for a live connection (UUID v7, time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection lifecycle: `Connecting -> Connected -> Disconnected`.
///
/// `Disconnected` is terminal; a reconnect is a brand new connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// A registered connection.
#[derive(Debug)]
pub struct Connection {
    state: ConnectionState,
    outbox: Outbox,
    opened_at: DateTime<Utc>,
}

impl Connection {
    pub(crate) fn new(outbox: Outbox) -> Self {
        Self {
            state: ConnectionState::Connecting,
            outbox,
            opened_at: Utc::now(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub(crate) fn mark_connected(&mut self) {
        if self.state == ConnectionState::Connecting {
            self.state = ConnectionState::Connected;
        }
    }

    pub(crate) fn mark_disconnected(&mut self) {
        self.state = ConnectionState::Disconnected;
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Queue an event for this connection. Never waits on the socket.
    ///
    /// Returns `false` when the transport side has gone away.
    pub(crate) fn push(&self, event: ServerEvent) -> bool {
        self.outbox.send(event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut conn = Connection::new(tx);
        assert_eq!(conn.state(), ConnectionState::Connecting);
        assert!(!conn.is_connected());

        conn.mark_connected();
        assert!(conn.is_connected());

        conn.mark_disconnected();
        assert_eq!(conn.state(), ConnectionState::Disconnected);

        // Disconnected is terminal.
        conn.mark_connected();
        assert_eq!(conn.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_push_fails_once_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Connection::new(tx);
        assert!(conn.push(ServerEvent::Pong));
        drop(rx);
        assert!(!conn.push(ServerEvent::Pong));
    }

    #[test]
    fn test_connection_ids_are_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }
}
