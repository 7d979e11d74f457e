//! HTTP layer: REST routes for chat messages, the `/ws` realtime endpoint,
//! JSON envelope and error bodies, and optional static file serving.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
