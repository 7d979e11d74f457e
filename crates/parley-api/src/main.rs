//! Parley chat server and CLI entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes logging, the database, and the message
//! service, then either starts the HTTP/WebSocket server or runs a one-shot
//! store command.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use parley_observe::tracing_setup::{init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    init_tracing(cli.log_format, filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = parley_infra::config::load_config(&cli.config).await;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    if let Commands::Serve {
        host,
        port,
        debug_errors,
    } = &cli.command
    {
        if let Some(host) = host {
            config.host = host.clone();
        }
        if let Some(port) = port {
            config.port = *port;
        }
        config.expose_error_details |= *debug_errors;
    }

    let state = AppState::init(config).await?;

    let result = run(cli.command, &state, cli.json, cli.quiet).await;

    state.db_pool.close().await;
    shutdown_tracing();
    result
}

async fn run(command: Commands, state: &AppState, json: bool, quiet: bool) -> anyhow::Result<()> {
    match command {
        Commands::Serve { .. } => serve(state.clone(), quiet).await?,

        Commands::List { limit, offset } => {
            cli::message::list_messages(state, limit, offset, json).await?;
        }

        Commands::Show { id } => {
            cli::message::show_message(state, id, json).await?;
        }

        Commands::Delete { id, force } => {
            cli::message::delete_message(state, id, force, json).await?;
        }

        Commands::Status => {
            cli::status::status(state, json).await?;
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Bind, open the gateway, and serve until Ctrl+C or SIGTERM.
async fn serve(state: AppState, quiet: bool) -> anyhow::Result<()> {
    let addr = state.config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let gateway = state.gateway.clone();
    gateway.open();
    tracing::info!(%addr, "Parley listening");

    if !quiet {
        println!(
            "  {} Parley listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(gateway.clone()))
        .await;

    gateway.close();
    tracing::info!("Server stopped");
    if !quiet {
        println!("\n  Server stopped.");
    }

    served.map_err(Into::into)
}

/// Wait for Ctrl+C or SIGTERM, then close the gateway.
///
/// Closing drops every connection's outbox, which makes each WebSocket
/// writer send a close frame so graceful shutdown is not held open by
/// long-lived sockets.
async fn shutdown_signal(gateway: std::sync::Arc<state::ConcreteChatGateway>) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    gateway.close();
}
