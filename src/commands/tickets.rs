//! `gatedesk tickets ...`
//!
//! Validation runs before the session is resolved, so an empty message is
//! reported even when logged out and never reaches the network.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, connect, copy_to_clipboard, is_stdin_tty, print_json, read_stdin};
use crate::api::Backend;
use crate::display::{is_compact, print_thread, print_ticket_table, terminal_width, today};
use crate::error::{DeskError, Result};
use crate::tickets::{Pager, TicketDraft, fetch_sorted_tickets, thread_order, validate_message};
use crate::types::Urgency;

/// Options for `tickets ls`
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Show pages 1 through `page` (1-based)
    pub page: Option<usize>,
    pub all: bool,
    pub json: bool,
}

pub async fn cmd_tickets_ls(options: ListOptions) -> Result<()> {
    let conn = connect()?;
    let tickets = fetch_sorted_tickets(&conn.backend, &conn.session).await?;

    let visible = if options.all {
        &tickets[..]
    } else {
        let page = options.page.unwrap_or(1).max(1) - 1;
        Pager::at_page(conn.config.page_size, page).visible(&tickets)
    };

    if options.json {
        return print_json(&json!({
            "total": tickets.len(),
            "tickets": visible,
        }));
    }

    print_ticket_table(
        visible,
        tickets.len(),
        today(),
        is_compact(terminal_width()),
    );
    Ok(())
}

pub async fn cmd_tickets_show(id: &str, output_json: bool) -> Result<()> {
    let conn = connect()?;
    let (tickets, messages) = tokio::join!(
        conn.backend.list_tickets(&conn.session),
        conn.backend.list_ticket_messages(&conn.session, id),
    );
    let ticket = tickets?
        .into_iter()
        .find(|t| t.ticket_id == id)
        .ok_or_else(|| DeskError::TicketNotFound(id.to_string()))?;
    let messages = thread_order(messages?);

    if output_json {
        return print_json(&json!({
            "ticket": ticket,
            "messages": messages,
        }));
    }

    print_thread(Some(&ticket), id, &messages);
    Ok(())
}

pub async fn cmd_tickets_create(
    title: &str,
    urgency: Urgency,
    message: &[String],
    output_json: bool,
) -> Result<()> {
    let draft = TicketDraft {
        title: title.to_string(),
        urgency,
        message: reply_text(message)?,
    };
    let ticket = draft.validate()?;

    let conn = connect()?;
    conn.backend.create_ticket(&conn.session, &ticket).await?;
    tracing::info!(title = %ticket.title, "ticket created");

    CommandOutput::new(json!({
        "action": "created",
        "title": ticket.title,
        "urgency": ticket.urgency.as_num(),
    }))
    .with_text(format!("Created ticket: {}", ticket.title))
    .print(output_json)
}

pub async fn cmd_tickets_reply(id: &str, message: &[String], output_json: bool) -> Result<()> {
    let message = validate_message(&reply_text(message)?)?;

    let conn = connect()?;
    conn.backend
        .create_ticket_message(&conn.session, id, &message)
        .await?;

    CommandOutput::new(json!({
        "id": id,
        "action": "replied",
    }))
    .with_text(format!("Replied to {}", id.cyan()))
    .print(output_json)
}

pub async fn cmd_tickets_close(id: &str, output_json: bool) -> Result<()> {
    let conn = connect()?;
    conn.backend.close_ticket(&conn.session, id).await?;
    tracing::info!(ticket_id = %id, "ticket closed");

    CommandOutput::new(json!({
        "id": id,
        "action": "closed",
    }))
    .with_text(format!("Closed {}", id.cyan()))
    .print(output_json)
}

pub fn cmd_tickets_copy(id: &str) -> Result<()> {
    let id = id.trim();
    if id.is_empty() {
        return Err(DeskError::Validation("Ticket ID cannot be empty".to_string()));
    }
    copy_to_clipboard(id)?;
    println!("Copied {} to clipboard", id.cyan());
    Ok(())
}

/// Message text from arguments, falling back to piped stdin
pub fn reply_text(args: &[String]) -> Result<String> {
    if !args.is_empty() {
        return Ok(args.join(" "));
    }
    if is_stdin_tty() {
        return Ok(String::new());
    }
    Ok(read_stdin()?)
}
