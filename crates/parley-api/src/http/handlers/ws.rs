//! WebSocket transport for the realtime chat gateway.
//!
//! The `/ws` endpoint upgrades an HTTP connection and bridges it to
//! [`ChatGateway`](parley_core::gateway::ChatGateway):
//!
//! - **Outbound:** a writer task drains the connection's outbox and writes
//!   each [`ServerEvent`] as a JSON text frame. When the gateway drops the
//!   outbox the writer sends a close frame and exits.
//! - **Inbound:** text frames are handed to the gateway as-is; it does the
//!   parsing and replies with `error` events for anything it rejects.
//!
//! Upgrades are refused with 503 while the gateway is not open.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use parley_types::event::ServerEvent;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /ws
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if !state.gateway.is_open() {
        return Err(AppError::Unavailable(
            "Realtime gateway is not accepting connections".to_string(),
        ));
    }

    Ok(ws
        .on_upgrade(move |socket| handle_ws_connection(socket, state))
        .into_response())
}

/// Drive one WebSocket connection until either side goes away.
async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (outbox, mut events) = mpsc::unbounded_channel::<ServerEvent>();

    let mut writer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(err) => {
                    tracing::warn!("Failed to serialize ServerEvent: {err}");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                return;
            }
        }
        let _ = ws_sender.send(Message::Close(None)).await;
    });

    let Some(id) = state.gateway.on_connect(outbox).await else {
        // Gateway closed between the upgrade check and registration.
        let _ = writer.await;
        return;
    };

    let reason = loop {
        tokio::select! {
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        state.gateway.on_client_frame(id, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break "client closed",
                    Some(Err(err)) => {
                        tracing::debug!(connection_id = %id, "WebSocket receive error: {err}");
                        break "transport error";
                    }
                    // Binary and protocol-level ping/pong frames are ignored.
                    Some(Ok(_)) => {}
                }
            }
            _ = &mut writer => break "writer closed",
        }
    };

    state.gateway.on_disconnect(id, reason);
    writer.abort();
}
