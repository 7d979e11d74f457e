//! Realtime wire events exchanged over the WebSocket channel.
//!
//! Frames are adjacently tagged JSON: `{"event": "<name>", "data": <payload>}`.
//! Event names mirror the chat protocol (`chat-history`, `chat-message`,
//! `error`, `ping`, `pong`).

use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;

/// Events pushed from the server to a connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Recent history, newest first. Sent exactly once per connection.
    ChatHistory(Vec<ChatMessage>),
    /// A newly persisted message, fanned out to every connection.
    ChatMessage(ChatMessage),
    /// Error notification scoped to a single connection.
    Error(ErrorNotice),
    /// Reply to a client `ping`.
    Pong,
}

impl ServerEvent {
    /// Build an error notification with the given text.
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error(ErrorNotice {
            message: message.into(),
        })
    }
}

/// Payload of an `error` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub message: String,
}

/// Events sent from a client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Post a chat message.
    ChatMessage(InboundMessage),
    /// Keep-alive ping. Server responds with `pong`.
    Ping,
}

/// Raw inbound chat payload.
///
/// Both fields are optional at the wire level so that a frame missing one of
/// them still parses and can be answered with an error notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
