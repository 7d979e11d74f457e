//! Infrastructure layer for Parley.
//!
//! Contains the implementation of the repository trait defined in
//! `parley-core` (SQLite via sqlx) and the TOML configuration loader.

pub mod config;
pub mod sqlite;
