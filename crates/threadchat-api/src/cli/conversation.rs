//! Conversation CLI commands: show, delete.

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use threadchat_types::conversation::ConversationId;
use threadchat_types::error::RepositoryError;
use threadchat_types::message::Sender;

use crate::state::AppState;

fn parse_id(raw: &str) -> Result<ConversationId> {
    raw.parse()
        .with_context(|| format!("Invalid conversation id '{raw}'"))
}

/// Print a conversation's messages in display order.
///
/// Unknown conversations are reported, never created.
///
/// # Examples
///
/// ```bash
/// threadchat show 0199a3c2-5b1e-7c4d-9e0f-123456789abc
/// threadchat show my-chat --json
/// ```
pub async fn show_conversation(state: &AppState, raw_id: &str, json: bool) -> Result<()> {
    let id = parse_id(raw_id)?;
    let conversations = state.exchange.conversations();

    let Some(conversation) = conversations.get(&id).await? else {
        bail!("Conversation '{id}' not found");
    };
    let messages = conversations.get_messages(&conversation).await?;

    if json {
        let value = serde_json::json!({
            "conversation": conversation,
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style("Conversation").bold(),
        style(&conversation.id).cyan().bold()
    );
    println!(
        "  {}",
        style(format!(
            "Started {}",
            conversation.created_at.format("%Y-%m-%d %H:%M:%S")
        ))
        .dim()
    );
    println!();

    if messages.is_empty() {
        println!("  {} No messages yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("Sender").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for message in &messages {
        let sender = match message.sender {
            Sender::User => Cell::new("user").fg(Color::Cyan),
            Sender::Bot => Cell::new("bot").fg(Color::Green),
        };
        table.add_row(vec![
            Cell::new(message.created_at.format("%H:%M:%S").to_string()),
            sender,
            Cell::new(&message.content),
        ]);
    }

    println!("{table}");
    println!();
    Ok(())
}

/// Delete a conversation and all its messages.
pub async fn delete_conversation(
    state: &AppState,
    raw_id: &str,
    force: bool,
    json: bool,
) -> Result<()> {
    let id = parse_id(raw_id)?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete conversation '{}' and all its messages?",
                style(&id).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    match state.exchange.conversations().delete(&id).await {
        Ok(()) => {}
        Err(RepositoryError::NotFound) => bail!("Conversation '{id}' not found"),
        Err(e) => return Err(e.into()),
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "deleted": id.as_str() }))?
        );
    } else {
        println!(
            "  {} Conversation '{}' deleted.",
            style("✓").green().bold(),
            style(&id).cyan()
        );
    }

    Ok(())
}
