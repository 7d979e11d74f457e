//! Store status command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Display message count, newest message, and database location.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let total = state.message_service.count().await?;
    let latest = state
        .message_service
        .list(Some(1), None)
        .await?
        .into_iter()
        .next();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "database_url": state.config.database_url,
            "messages": total,
            "latest_message_at": latest.as_ref().map(|m| m.timestamp),
            "history_limit": state.config.history_limit,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} Parley v{}", style("⚡").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Messages ──").dim());
    println!("  Stored:  {}", style(total).bold());
    match &latest {
        Some(msg) => println!(
            "  Latest:  {} by {}",
            msg.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            style(&msg.username).cyan()
        ),
        None => println!("  Latest:  {}", style("none").dim()),
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Database: {}", style(&state.config.database_url).dim());
    println!("  Engine:   {}", style("SQLite (WAL mode)").dim());
    println!(
        "  History replay: {} messages",
        state.config.history_limit
    );
    println!();

    Ok(())
}
