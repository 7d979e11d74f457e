//! CLI command definitions for the `parley` binary.
//!
//! `parley serve` runs the HTTP + WebSocket server; the remaining commands
//! operate on the message store directly, without a running server.

pub mod message;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use parley_observe::tracing_setup::LogFormat;

/// Minimal realtime chat server.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format: text or json.
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Path to the TOML config file.
    #[arg(long, global = true, env = "PARLEY_CONFIG", default_value = parley_infra::config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// SQLite connection URL (overrides the config file).
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP and WebSocket server.
    Serve {
        /// Host to bind to.
        #[arg(long, env = "PARLEY_HOST")]
        host: Option<String>,

        /// Port to listen on.
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Include internal error detail in 5xx responses.
        #[arg(long, env = "PARLEY_DEBUG_ERRORS")]
        debug_errors: bool,
    },

    /// List stored messages, newest first.
    #[command(alias = "ls")]
    List {
        /// Maximum messages to show (1-100).
        #[arg(short, long, default_value_t = 20)]
        limit: i64,

        /// Number of newest messages to skip.
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },

    /// Show a single message.
    Show {
        /// Message id.
        id: i64,
    },

    /// Delete a message.
    #[command(alias = "rm")]
    Delete {
        /// Message id.
        id: i64,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        force: bool,
    },

    /// Show message store status.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::try_parse_from([
            "parley", "--log-format", "json", "serve", "--host", "127.0.0.1", "-p", "4000",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Serve { host, port, .. } => {
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(4000));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["parley", "--log-format", "xml", "status"]).is_err());
    }
}
