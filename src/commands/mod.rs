mod account;
mod config;
mod desk;
mod session;
mod tickets;

pub use account::{
    cmd_contact, cmd_password_check, cmd_password_update, cmd_price, cmd_stores_create,
    cmd_stores_ls, validate_contact, validate_new_store, validate_password_update,
};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use desk::cmd_desk;
pub use session::{cmd_session_clear, cmd_session_set, cmd_session_show};
pub use tickets::{
    ListOptions, cmd_tickets_close, cmd_tickets_copy, cmd_tickets_create, cmd_tickets_ls,
    cmd_tickets_reply, cmd_tickets_show, reply_text,
};

use std::io::{self, BufRead};

use clipboard_rs::{Clipboard, ClipboardContext};
use serde_json::Value;

use crate::api::HttpBackend;
use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::session::Session;

/// Result of a command, printable as text or JSON
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output_json: bool) -> Result<()> {
        if output_json {
            return print_json(&self.json);
        }
        match self.text {
            Some(text) => println!("{text}"),
            None => print_json(&self.json)?,
        }
        Ok(())
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Everything an authenticated command needs
pub(crate) struct Connection {
    pub config: Config,
    pub backend: HttpBackend,
    pub session: Session,
}

pub(crate) fn connect() -> Result<Connection> {
    let config = Config::load()?;
    let session = Session::resolve()?;
    let backend = HttpBackend::from_config(&config)?;
    Ok(Connection {
        config,
        backend,
        session,
    })
}

/// Backend for operations that do not need a session
pub(crate) fn connect_anonymous() -> Result<HttpBackend> {
    HttpBackend::from_config(&Config::load()?)
}

/// Read all input from stdin (for piped input)
pub fn read_stdin() -> io::Result<String> {
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        lines.push(line?);
    }
    Ok(lines.join("\n").trim().to_string())
}

pub fn is_stdin_tty() -> bool {
    atty::is(atty::Stream::Stdin)
}

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    ClipboardContext::new()
        .and_then(|ctx| ctx.set_text(text.to_string()))
        .map_err(|e| DeskError::Other(format!("Failed to copy to clipboard: {e}")))
}
