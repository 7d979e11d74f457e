//! Server configuration types for Parley.
//!
//! `ServerConfig` mirrors the optional `parley.toml` file. Every field has a
//! default so a partial (or absent) file is always usable.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the chat server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// sqlx SQLite connection URL.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Number of recent messages replayed to each new WebSocket connection.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Directory served for non-API paths when it exists.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Include internal error detail in 5xx responses (debug mode).
    #[serde(default)]
    pub expose_error_details: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "sqlite://parley.db?mode=rwc".to_string()
}

fn default_history_limit() -> u32 {
    20
}

fn default_static_dir() -> String {
    "public".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            history_limit: default_history_limit(),
            static_dir: default_static_dir(),
            expose_error_details: false,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
