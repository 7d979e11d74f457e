//! Chat message handlers for the REST API.
//!
//! Every write goes through [`MessageService`](parley_core::service::message::MessageService);
//! a successful POST is also pushed to realtime clients through the gateway.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use parley_types::error::MessageError;

use crate::http::error::AppError;
use crate::http::extractors::query::{MessageListQuery, parse_message_id};
use crate::http::response::{ApiResponse, MessageData, MessageListData};
use crate::state::AppState;

/// Request body for posting a message.
///
/// Both fields are optional at the JSON level so that a missing field gets
/// the same 400 as an empty one.
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// POST /api/chat/messages
pub async fn create_message(
    State(state): State<AppState>,
    body: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected message body");
        AppError::BadRequest("Invalid JSON body".to_string())
    })?;

    let saved = state
        .message_service
        .create(
            req.username.as_deref().unwrap_or_default(),
            req.message.as_deref().unwrap_or_default(),
        )
        .await?;

    if !state.gateway.broadcast(&saved) {
        tracing::warn!(message_id = %saved.id, "Realtime gateway unavailable, message not broadcast");
    }

    Ok(ApiResponse::created(MessageData { message: saved }).into_response())
}

/// GET /api/chat/messages?limit=&offset=
pub async fn list_messages(
    State(state): State<AppState>,
    query: Result<Query<MessageListQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let params = query.validate()?;

    let messages = state
        .message_service
        .list(params.limit, params.offset)
        .await?;
    let count = messages.len();

    Ok(ApiResponse::success(MessageListData { messages })
        .with_results(count)
        .into_response())
}

/// GET /api/chat/messages/{id}
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_message_id(&id)?;
    let message = state.message_service.get_by_id(id).await?;

    Ok(ApiResponse::success(MessageData { message }).into_response())
}

/// DELETE /api/chat/messages/{id}
///
/// 204 with no body on success, 404 when nothing was deleted.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_message_id(&id)?;

    if state.message_service.delete_by_id(id).await? {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(MessageError::NotFound { id }.into())
    }
}
