//! Application error type mapping to HTTP status codes and the error body.
//!
//! Body shape: `{"status": "fail"|"error", "statusCode": N, "code": "...", "message": "..."}`.
//! `fail` marks caller mistakes (4xx), `error` marks server faults (5xx).
//!
//! Internal detail is never written into the body here. It rides along in an
//! [`ErrorDetail`] response extension and [`attach_error_detail`] adds it to
//! the body only when `expose_error_details` is enabled.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use parley_types::error::MessageError;

use crate::state::AppState;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Message service errors.
    Message(MessageError),
    /// Request rejected before reaching the service (bad JSON, bad params).
    BadRequest(String),
    /// No route matched the request path.
    RouteNotFound(String),
    /// The realtime gateway is not accepting connections.
    Unavailable(String),
}

impl From<MessageError> for AppError {
    fn from(e: MessageError) -> Self {
        AppError::Message(e)
    }
}

/// Private error detail carried to [`attach_error_detail`].
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    body: Value,
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match self {
            AppError::Message(MessageError::Validation { message }) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, None)
            }
            AppError::Message(MessageError::NotFound { .. }) => (
                StatusCode::NOT_FOUND,
                "MESSAGE_NOT_FOUND",
                "Message not found".to_string(),
                None,
            ),
            AppError::Message(MessageError::Conflict { message }) => {
                (StatusCode::CONFLICT, "CONFLICT", message, None)
            }
            AppError::Message(MessageError::Internal {
                code,
                message,
                detail,
            }) => (StatusCode::INTERNAL_SERVER_ERROR, code, message, Some(detail)),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, None)
            }
            AppError::Unavailable(message) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", message, None)
            }
            AppError::RouteNotFound(path) => {
                let body = json!({
                    "status": "error",
                    "statusCode": 404,
                    "message": "Resource not found",
                    "path": path,
                });
                return json_response(StatusCode::NOT_FOUND, &body);
            }
        };

        let body = json!({
            "status": if status.is_client_error() { "fail" } else { "error" },
            "statusCode": status.as_u16(),
            "code": code,
            "message": message,
        });

        let mut response = json_response(status, &body);
        if let Some(detail) = detail {
            response
                .extensions_mut()
                .insert(ErrorDetail { body, detail });
        }
        response
    }
}

fn json_response(status: StatusCode, body: &Value) -> Response {
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

/// Middleware: in debug mode, add internal error detail to error bodies.
pub async fn attach_error_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(ErrorDetail { mut body, detail }) = response.extensions_mut().remove::<ErrorDetail>()
    else {
        return response;
    };
    if !state.config.expose_error_details {
        return response;
    }

    body["detail"] = Value::String(detail);
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(body.to_string()))
}
