//! Axum router configuration with middleware.
//!
//! REST routes live under `/api/chat/`, the realtime endpoint at `/ws`.
//! Middleware: error detail (debug mode), CORS, tracing.
//!
//! Non-API paths are served from `static_dir` when that directory exists;
//! anything it cannot satisfy gets the JSON 404 body.

use axum::Router;
use axum::extract::State;
use axum::handler::HandlerWithoutStateExt;
use axum::http::Uri;
use axum::middleware::from_fn_with_state;
use axum::response::Redirect;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::error::{AppError, attach_error_detail};
use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let chat_routes = Router::new()
        .route(
            "/messages",
            get(handlers::message::list_messages).post(handlers::message::create_message),
        )
        .route(
            "/messages/{id}",
            get(handlers::message::get_message).delete(handlers::message::delete_message),
        );

    let mut router = Router::new()
        .nest("/api/chat", chat_routes)
        .route("/ws", get(handlers::ws::ws_handler))
        .route("/health", get(health_check))
        .route("/", get(|| async { Redirect::temporary("/chat.html") }));

    let static_dir = std::path::Path::new(&state.config.static_dir);
    if static_dir.is_dir() {
        let serve_dir = ServeDir::new(static_dir)
            .call_fallback_on_method_not_allowed(true)
            .not_found_service(not_found.into_service());
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %static_dir.display(), "Static file serving enabled");
    } else {
        router = router.fallback(not_found);
    }

    router
        .layer(from_fn_with_state(state.clone(), attach_error_detail))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "connections": state.gateway.connected_count(),
    }))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::RouteNotFound(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use parley_types::config::ServerConfig;
    use parley_types::event::ServerEvent;

    async fn test_state(expose_error_details: bool) -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            database_url: format!("sqlite://{}?mode=rwc", dir.path().join("chat.db").display()),
            static_dir: dir.path().join("missing").display().to_string(),
            expose_error_details,
            ..ServerConfig::default()
        };
        let state = AppState::init(config).await.unwrap();
        state.gateway.open();
        (state, dir)
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::post("/api/chat/messages")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::delete(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_connection_count() {
        let (state, _dir) = test_state(false).await;
        let (tx, _rx) = mpsc::unbounded_channel();
        state.gateway.on_connect(tx).await.unwrap();

        let (status, body) = send(&state, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["connections"], 1);
    }

    #[tokio::test]
    async fn post_creates_and_broadcasts() {
        let (state, _dir) = test_state(false).await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.gateway.on_connect(tx).await.unwrap();
        assert!(matches!(rx.try_recv(), Ok(ServerEvent::ChatHistory(h)) if h.is_empty()));

        let (status, body) = send(&state, post_json(r#"{"username":" alice ","message":"hello"}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["message"]["username"], "alice");
        assert_eq!(body["data"]["message"]["message"], "hello");
        let id = body["data"]["message"]["id"].as_i64().unwrap();
        assert!(id >= 1);

        match rx.try_recv() {
            Ok(ServerEvent::ChatMessage(msg)) => assert_eq!(msg.id.0, id),
            other => panic!("expected broadcast, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn post_too_long_is_rejected_without_write_or_broadcast() {
        let (state, _dir) = test_state(false).await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.gateway.on_connect(tx).await.unwrap();
        let _history = rx.try_recv();

        let payload = json!({"username": "bob", "message": "a".repeat(1001)}).to_string();
        let (status, body) = send(&state, post_json(&payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "Message is too long");

        assert_eq!(state.message_service.count().await.unwrap(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn post_missing_field_or_bad_json_is_400() {
        let (state, _dir) = test_state(false).await;

        let (status, body) = send(&state, post_json(r#"{"username":"bob"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Username and message are required");

        let (status, body) = send(&state, post_json("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["statusCode"], 400);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_validates_params() {
        let (state, _dir) = test_state(false).await;
        for i in 0..3 {
            state
                .message_service
                .create("bob", &format!("msg {i}"))
                .await
                .unwrap();
        }

        let (status, body) = send(&state, get("/api/chat/messages?limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], 2);
        let messages = body["data"]["messages"].as_array().unwrap();
        assert_eq!(messages[0]["message"], "msg 2");
        assert_eq!(messages[1]["message"], "msg 1");

        let (_, body) = send(&state, get("/api/chat/messages?limit=5&offset=2")).await;
        assert_eq!(body["data"]["messages"][0]["message"], "msg 0");

        let (status, body) = send(&state, get("/api/chat/messages?limit=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Limit must be between 1 and 100");

        let (status, body) = send(&state, get("/api/chat/messages?offset=-1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Offset must be a positive number");
    }

    #[tokio::test]
    async fn get_by_id_found_missing_and_invalid() {
        let (state, _dir) = test_state(false).await;
        let created = state.message_service.create("carol", "hi").await.unwrap();

        let (status, body) = send(&state, get(&format!("/api/chat/messages/{}", created.id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"]["username"], "carol");

        let (status, body) = send(&state, get("/api/chat/messages/9999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Message not found");

        let (status, body) = send(&state, get("/api/chat/messages/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "ID must be a positive integer");
    }

    #[tokio::test]
    async fn delete_then_delete_again() {
        let (state, _dir) = test_state(false).await;
        let created = state.message_service.create("dave", "bye").await.unwrap();
        let uri = format!("/api/chat/messages/{}", created.id);

        let (status, body) = send(&state, delete(&uri)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = send(&state, delete(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "Message not found");
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let (state, _dir) = test_state(false).await;
        let (status, body) = send(&state, get("/api/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Resource not found");
        assert_eq!(body["path"], "/api/nope");
    }

    #[tokio::test]
    async fn root_redirects_to_chat_page() {
        let (state, _dir) = test_state(false).await;
        let response = build_router(state).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/chat.html");
    }

    #[tokio::test]
    async fn internal_detail_only_in_debug_mode() {
        let (state, _dir) = test_state(false).await;
        state.db_pool.close().await;
        let (status, body) = send(&state, get("/api/chat/messages")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "MESSAGES_FETCH_ERROR");
        assert_eq!(body["message"], "Failed to fetch messages");
        assert!(body.get("detail").is_none());

        let (state, _dir) = test_state(true).await;
        state.db_pool.close().await;
        let (status, body) = send(&state, get("/api/chat/messages")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().is_some());
    }

    #[tokio::test]
    async fn static_files_served_when_dir_exists() {
        let dir = TempDir::new().unwrap();
        let public = dir.path().join("public");
        std::fs::create_dir(&public).unwrap();
        std::fs::write(public.join("chat.html"), "<html>chat</html>").unwrap();

        let config = ServerConfig {
            database_url: format!("sqlite://{}?mode=rwc", dir.path().join("chat.db").display()),
            static_dir: public.display().to_string(),
            ..ServerConfig::default()
        };
        let state = AppState::init(config).await.unwrap();

        let response = build_router(state.clone()).oneshot(get("/chat.html")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (status, body) = send(&state, get("/missing.css")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["path"], "/missing.css");
    }
}
