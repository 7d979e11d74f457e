//! Message service, realtime gateway, and repository trait definitions for Parley.
//!
//! This crate defines the "port" (`MessageRepository`) that the infrastructure
//! layer implements, the `MessageService` use cases, and the `ChatGateway`
//! that fans persisted messages out to live connections. It depends only on
//! `parley-types` -- never on `parley-infra` or any database/IO crate.

pub mod gateway;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
