//! Success envelope for API responses.
//!
//! ```json
//! { "status": "success", "results": 2, "data": { "messages": [ ... ] } }
//! ```
//!
//! `results` is only present on list responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use parley_types::message::ChatMessage;

/// Envelope response wrapping successful API data.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `"success"`.
    pub status: &'static str,

    /// Item count for list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,

    /// The main response payload.
    pub data: T,

    #[serde(skip)]
    status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a 200 success response with data.
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            results: None,
            data,
            status_code: StatusCode::OK,
        }
    }

    /// Create a 201 response for a newly created resource.
    pub fn created(data: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            ..Self::success(data)
        }
    }

    /// Attach the item count of a list response.
    pub fn with_results(mut self, results: usize) -> Self {
        self.results = Some(results);
        self
    }
}

/// `data` payload holding a single message.
#[derive(Debug, Serialize)]
pub struct MessageData {
    pub message: ChatMessage,
}

/// `data` payload holding a page of messages.
#[derive(Debug, Serialize)]
pub struct MessageListData {
    pub messages: Vec<ChatMessage>,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = serde_json::to_string(&self).unwrap_or_else(|_| {
            r#"{"status":"error","statusCode":500,"message":"Failed to serialize response"}"#
                .to_string()
        });

        (
            self.status_code,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
