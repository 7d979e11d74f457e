//! HTTP request handlers.

pub mod message;
pub mod ws;
