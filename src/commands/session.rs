//! `gatedesk session ...`: store, inspect and forget the login token.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, is_stdin_tty, read_stdin};
use crate::error::{DeskError, Result};
use crate::session::{SESSION_ENV, Session, SessionStore};

/// Store a session token. With no argument the token is read from stdin.
pub fn cmd_session_set(token: Option<&str>) -> Result<()> {
    let token = match token {
        Some(t) => t.to_string(),
        None if !is_stdin_tty() => read_stdin()?,
        None => {
            return Err(DeskError::Validation(
                "Session token cannot be empty".to_string(),
            ));
        }
    };
    let store = SessionStore::open()?;
    store.save(&token)?;
    println!(
        "Session saved to {}",
        store.path().display().to_string().dimmed()
    );
    Ok(())
}

pub fn cmd_session_show(output_json: bool) -> Result<()> {
    let from_env = std::env::var(SESSION_ENV).is_ok_and(|t| !t.trim().is_empty());
    let session = Session::resolve()?;
    let source = if from_env { SESSION_ENV } else { "session file" };

    CommandOutput::new(json!({
        "logged_in": true,
        "token": session.masked(),
        "source": source,
    }))
    .with_text(format!(
        "Logged in with token {} ({})",
        session.masked().cyan(),
        source
    ))
    .print(output_json)
}

pub fn cmd_session_clear() -> Result<()> {
    if SessionStore::open()?.clear()? {
        println!("Session cleared");
    } else {
        println!("No stored session");
    }
    Ok(())
}
