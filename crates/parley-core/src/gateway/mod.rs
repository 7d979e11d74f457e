//! Realtime gateway: connection registry, history replay, and fan-out.
//!
//! The gateway owns the set of live connections. Transports (the WebSocket
//! handler in parley-api) hand it an [`Outbox`] per connection and forward
//! inbound frames; they never touch the registry directly.
//!
//! - **Connect:** the connection is registered and marked connected before
//!   history is fetched, then receives exactly one `chat-history` batch
//!   (empty, preceded by an `error`, if the fetch fails).
//! - **Inbound message:** persisted through [`MessageService`], then the
//!   stored row is broadcast to every connected client including the sender.
//!   Rejections produce an `error` for the sender only.
//! - **Broadcast:** pushes onto each outbox without awaiting any socket, so a
//!   slow client only delays its own writer.

pub mod connection;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use dashmap::DashMap;
use parley_types::event::{ClientEvent, InboundMessage, ServerEvent};
use parley_types::message::ChatMessage;

use crate::repository::message::MessageRepository;
use crate::service::message::MessageService;

pub use connection::{Connection, ConnectionId, ConnectionState, Outbox};

/// Default number of messages replayed to a new connection.
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

const HISTORY_FAILED: &str = "Failed to load chat history";
const INVALID_FORMAT: &str = "Invalid message format";
const SEND_FAILED: &str = "Failed to send message";

/// Whether the gateway's fan-out channel is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GatewayStatus {
    /// Constructed but the server is not accepting connections yet.
    Pending = 0,
    /// Accepting connections and broadcasting.
    Open = 1,
    /// Shut down; every connection has been dropped.
    Closed = 2,
}

impl GatewayStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => GatewayStatus::Open,
            2 => GatewayStatus::Closed,
            _ => GatewayStatus::Pending,
        }
    }
}

impl fmt::Display for GatewayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayStatus::Pending => write!(f, "pending"),
            GatewayStatus::Open => write!(f, "open"),
            GatewayStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Coordinates persistence and fan-out for realtime chat.
pub struct ChatGateway<R: MessageRepository> {
    service: Arc<MessageService<R>>,
    connections: DashMap<ConnectionId, Connection>,
    status: AtomicU8,
    history_limit: i64,
}

impl<R: MessageRepository> ChatGateway<R> {
    /// Create a gateway in the `Pending` state.
    ///
    /// `history_limit` is the size of the batch replayed on connect.
    pub fn new(service: Arc<MessageService<R>>, history_limit: u32) -> Self {
        Self {
            service,
            connections: DashMap::new(),
            status: AtomicU8::new(GatewayStatus::Pending as u8),
            history_limit: i64::from(history_limit.max(1)),
        }
    }

    pub fn status(&self) -> GatewayStatus {
        GatewayStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    pub fn is_open(&self) -> bool {
        self.status() == GatewayStatus::Open
    }

    /// Start accepting connections. No effect once closed.
    pub fn open(&self) {
        let _ = self.status.compare_exchange(
            GatewayStatus::Pending as u8,
            GatewayStatus::Open as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        tracing::info!(status = %self.status(), "Chat gateway opened");
    }

    /// Stop broadcasting and drop every connection.
    ///
    /// Dropping the outboxes ends each transport's writer, which closes the
    /// socket.
    pub fn close(&self) {
        self.status
            .store(GatewayStatus::Closed as u8, Ordering::SeqCst);
        let mut dropped = 0usize;
        self.connections.retain(|_, conn| {
            conn.mark_disconnected();
            dropped += 1;
            false
        });
        tracing::info!(dropped, "Chat gateway closed");
    }

    /// Number of connections currently in the `Connected` state.
    pub fn connected_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|entry| entry.is_connected())
            .count()
    }

    /// Current state of a connection, if it is still registered.
    pub fn connection_state(&self, id: ConnectionId) -> Option<ConnectionState> {
        self.connections.get(&id).map(|conn| conn.state())
    }

    /// Register a new connection and replay recent history to it.
    ///
    /// Returns `None` (dropping the outbox) when the gateway is not open.
    pub async fn on_connect(&self, outbox: Outbox) -> Option<ConnectionId> {
        if !self.is_open() {
            tracing::warn!(status = %self.status(), "Refusing connection: gateway not open");
            return None;
        }

        let id = ConnectionId::new();
        self.connections.insert(id, Connection::new(outbox));
        if let Some(mut conn) = self.connections.get_mut(&id) {
            conn.mark_connected();
        }
        tracing::info!(connection_id = %id, "Connection established");

        self.replay_history(id).await;
        Some(id)
    }

    /// Send the most recent messages, newest first, to one connection.
    async fn replay_history(&self, id: ConnectionId) {
        let history = match self.service.list(Some(self.history_limit), Some(0)).await {
            Ok(messages) => {
                tracing::debug!(connection_id = %id, count = messages.len(), "Sending chat history");
                messages
            }
            Err(err) => {
                tracing::error!(connection_id = %id, error = %err, "Failed to fetch chat history");
                self.send_to(id, ServerEvent::error(HISTORY_FAILED));
                Vec::new()
            }
        };
        self.send_to(id, ServerEvent::ChatHistory(history));
    }

    /// Parse and dispatch a raw text frame from a client.
    pub async fn on_client_frame(&self, id: ConnectionId, text: &str) {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(ClientEvent::ChatMessage(payload)) => self.on_inbound_message(id, payload).await,
            Ok(ClientEvent::Ping) => {
                self.send_to(id, ServerEvent::Pong);
            }
            Err(err) => {
                tracing::warn!(connection_id = %id, error = %err, "Malformed client frame");
                self.send_to(id, ServerEvent::error(INVALID_FORMAT));
            }
        }
    }

    /// Persist an inbound chat message and fan it out.
    pub async fn on_inbound_message(&self, id: ConnectionId, payload: InboundMessage) {
        if !self.is_connected(id) {
            tracing::debug!(connection_id = %id, "Ignoring message from unregistered connection");
            return;
        }

        let (username, message) = match (payload.username, payload.message) {
            (Some(username), Some(message)) if !username.is_empty() && !message.is_empty() => {
                (username, message)
            }
            _ => {
                tracing::warn!(connection_id = %id, "Rejected chat message with missing fields");
                self.send_to(id, ServerEvent::error(INVALID_FORMAT));
                return;
            }
        };

        match self.service.create(&username, &message).await {
            Ok(saved) => {
                if !self.broadcast(&saved) {
                    tracing::warn!(message_id = %saved.id, "Message saved but not broadcast");
                }
            }
            Err(err) => {
                tracing::warn!(connection_id = %id, error = %err, "Failed to handle chat message");
                let notice = if err.is_client_error() {
                    err.to_string()
                } else {
                    SEND_FAILED.to_string()
                };
                self.send_to(id, ServerEvent::error(notice));
            }
        }
    }

    /// Deregister a connection. Unknown or already-removed ids are ignored.
    pub fn on_disconnect(&self, id: ConnectionId, reason: &str) {
        match self.connections.remove(&id) {
            Some((_, mut conn)) => {
                conn.mark_disconnected();
                tracing::info!(
                    connection_id = %id,
                    reason,
                    opened_at = %conn.opened_at(),
                    "Connection closed"
                );
            }
            None => {
                tracing::debug!(connection_id = %id, reason, "Connection already closed");
            }
        }
    }

    /// Deliver a persisted message to every connected client.
    ///
    /// Returns `false` without delivering anything when the gateway is not
    /// open; `true` otherwise, even with zero listeners.
    pub fn broadcast(&self, message: &ChatMessage) -> bool {
        if !self.is_open() {
            tracing::warn!(status = %self.status(), "Fan-out channel not available for broadcast");
            return false;
        }

        let event = ServerEvent::ChatMessage(message.clone());
        let mut delivered = 0usize;
        let mut stale = Vec::new();

        for entry in self.connections.iter() {
            if !entry.is_connected() {
                continue;
            }
            if entry.push(event.clone()) {
                delivered += 1;
            } else {
                stale.push(*entry.key());
            }
        }

        // Removal happens after iteration: DashMap shards stay read-locked
        // while the iterator is alive.
        for id in stale {
            self.on_disconnect(id, "outbox closed");
        }

        tracing::debug!(message_id = %message.id, delivered, "Broadcast message");
        true
    }

    fn is_connected(&self, id: ConnectionId) -> bool {
        self.connections
            .get(&id)
            .is_some_and(|conn| conn.is_connected())
    }

    fn send_to(&self, id: ConnectionId, event: ServerEvent) -> bool {
        let Some(conn) = self.connections.get(&id) else {
            return false;
        };
        let sent = conn.push(event);
        if !sent {
            tracing::debug!(connection_id = %id, "Outbox closed, dropping event");
        }
        sent
    }
}
