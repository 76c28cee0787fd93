#![allow(dead_code)]

use std::io::Write;
use std::process::{Command, Output, Stdio};

use parking_lot::Mutex;
use tempfile::TempDir;

use gatedesk::api::{Backend, ContactForm, NewStore, NewTicket};
use gatedesk::error::{DeskError, Result};
use gatedesk::session::Session;
use gatedesk::types::{CurrencyPrice, Message, Store, Ticket, Urgency};

/// Nothing listens here, so any request fails fast as a transport error
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9/";

/// Helper struct to run gatedesk commands against an isolated config dir
pub struct DeskTest {
    pub temp_dir: TempDir,
}

impl DeskTest {
    pub fn new() -> Self {
        DeskTest {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_gatedesk"));
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .env("GATEDESK_CONFIG_DIR", self.temp_dir.path())
            .env("GATEDESK_API_URL", UNREACHABLE_API)
            .env_remove("GATEDESK_SESSION")
            .env_remove("GATEDESK_LOG");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .stdin(Stdio::null())
            .output()
            .expect("Failed to execute gatedesk command")
    }

    pub fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn gatedesk command");
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(input.as_bytes())
            .expect("Failed to write stdin");
        child.wait_with_output().expect("Failed to wait for gatedesk")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn session_file_exists(&self) -> bool {
        self.temp_dir.path().join("session.yaml").exists()
    }
}

pub fn ticket(id: &str, active: bool, urgency: Urgency, updated: &str) -> Ticket {
    Ticket {
        ticket_id: id.to_string(),
        title: format!("Ticket {id}"),
        date_created: "2024-01-01T00:00:00Z".to_string(),
        date_updated: updated.to_string(),
        is_active: active,
        urgency,
        last_reply: String::new(),
    }
}

pub fn message(name: &str, text: &str, date: &str) -> Message {
    Message {
        name: name.to_string(),
        message: text.to_string(),
        date_created: date.to_string(),
    }
}

/// In-memory backend that records every call
#[derive(Default)]
pub struct FakeBackend {
    pub tickets: Mutex<Vec<Ticket>>,
    /// Thread, newest first like the real backend
    pub messages: Mutex<Vec<Message>>,
    /// When set, every call is rejected with this message
    pub reject_with: Mutex<Option<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        let backend = Self::default();
        *backend.tickets.lock() = tickets;
        backend
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: impl Into<String>) -> Result<()> {
        self.calls.lock().push(call.into());
        match self.reject_with.lock().clone() {
            Some(message) => Err(DeskError::Rejected(message)),
            None => Ok(()),
        }
    }
}

impl Backend for FakeBackend {
    async fn list_tickets(&self, _session: &Session) -> Result<Vec<Ticket>> {
        self.record("list_tickets")?;
        Ok(self.tickets.lock().clone())
    }

    async fn list_ticket_messages(&self, _session: &Session, ticket_id: &str) -> Result<Vec<Message>> {
        self.record(format!("list_ticket_messages {ticket_id}"))?;
        Ok(self.messages.lock().clone())
    }

    async fn create_ticket(&self, _session: &Session, new_ticket: &NewTicket) -> Result<()> {
        self.record(format!("create_ticket {}", new_ticket.title))?;
        let id = format!("t-{}", self.tickets.lock().len() + 1);
        let mut created = ticket(&id, true, new_ticket.urgency, "2024-12-31T00:00:00Z");
        created.title = new_ticket.title.clone();
        self.tickets.lock().push(created);
        Ok(())
    }

    async fn create_ticket_message(
        &self,
        _session: &Session,
        ticket_id: &str,
        text: &str,
    ) -> Result<()> {
        self.record(format!("create_ticket_message {ticket_id}"))?;
        self.messages
            .lock()
            .insert(0, message("me", text, "2024-12-31T00:00:00Z"));
        Ok(())
    }

    async fn close_ticket(&self, _session: &Session, ticket_id: &str) -> Result<()> {
        self.record(format!("close_ticket {ticket_id}"))?;
        for t in self.tickets.lock().iter_mut() {
            if t.ticket_id == ticket_id {
                t.is_active = false;
            }
        }
        Ok(())
    }

    async fn list_stores(&self, _session: &Session) -> Result<Vec<Store>> {
        self.record("list_stores")?;
        Ok(Vec::new())
    }

    async fn create_store(&self, _session: &Session, store: &NewStore) -> Result<Store> {
        self.record(format!("create_store {}", store.name))?;
        Ok(Store {
            store_id: "s-1".to_string(),
            name: store.name.clone(),
            url: store.url.clone(),
            date_created: "2024-12-31T00:00:00Z".to_string(),
        })
    }

    async fn currency_price(
        &self,
        _session: &Session,
        currency: &str,
        fiat: &str,
    ) -> Result<CurrencyPrice> {
        self.record(format!("currency_price {currency} {fiat}"))?;
        Ok(CurrencyPrice {
            currency: currency.to_string(),
            fiat: fiat.to_string(),
            price: "1".to_string(),
        })
    }

    async fn check_recovery_token(&self, _recovery_token: &str) -> Result<()> {
        self.record("check_recovery_token")
    }

    async fn update_password(&self, _recovery_token: &str, _password: &str) -> Result<()> {
        self.record("update_password")
    }

    async fn submit_contact(&self, form: &ContactForm) -> Result<()> {
        self.record(format!("submit_contact {}", form.email))
    }
}
