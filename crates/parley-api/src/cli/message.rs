//! Message CLI commands: list, show, delete.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use parley_types::message::{ChatMessage, MessageId};

use crate::state::AppState;

/// Print a page of messages, newest first.
pub async fn list_messages(state: &AppState, limit: i64, offset: i64, json: bool) -> Result<()> {
    let messages = state
        .message_service
        .list(Some(limit), Some(offset))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!("  {} No messages yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("User").fg(Color::White),
        Cell::new("Message").fg(Color::White),
        Cell::new("Sent").fg(Color::White),
    ]);

    for msg in &messages {
        table.add_row(vec![
            Cell::new(msg.id).fg(Color::DarkGrey),
            Cell::new(&msg.username).fg(Color::Cyan),
            Cell::new(truncate(&msg.message, 60)),
            Cell::new(format_relative_time(&msg.timestamp)).fg(Color::DarkGrey),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Print one message in full.
pub async fn show_message(state: &AppState, id: i64, json: bool) -> Result<()> {
    let msg = state.message_service.get_by_id(MessageId(id)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&msg)?);
        return Ok(());
    }

    print_message(&msg);
    Ok(())
}

/// Delete a message, asking for confirmation unless `force` or `json`.
pub async fn delete_message(state: &AppState, id: i64, force: bool, json: bool) -> Result<()> {
    let id = MessageId(id);

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Permanently delete message {}?", style(id).red().bold()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let deleted = state.message_service.delete_by_id(id).await?;

    if json {
        println!("{}", serde_json::json!({"deleted": deleted, "id": id}));
    } else if deleted {
        println!("  {} Message {} deleted.", style("✓").red().bold(), id);
    } else {
        anyhow::bail!("message {id} not found");
    }

    Ok(())
}

fn print_message(msg: &ChatMessage) {
    println!();
    println!(
        "  {} {}  {}",
        style(format!("#{}", msg.id)).dim(),
        style(&msg.username).cyan().bold(),
        style(msg.timestamp.format("%Y-%m-%d %H:%M:%S UTC")).dim()
    );
    println!();
    for line in msg.message.lines() {
        println!("  {line}");
    }
    println!();
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() > max_chars {
        let head: String = single_line.chars().take(max_chars - 3).collect();
        format!("{head}...")
    } else {
        single_line
    }
}

fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let diff = chrono::Utc::now() - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}
