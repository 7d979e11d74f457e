//! Shared domain types for Parley.
//!
//! This crate contains the types used across the chat service: the persisted
//! `ChatMessage`, the realtime wire events, configuration, and the error
//! taxonomy shared by the service layer and its adapters.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod message;
