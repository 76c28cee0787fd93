//! Gateway backend RPC surface.
//!
//! Every call is a named operation that takes a JSON object and answers with
//! an envelope `{ "result": "success" | "error", "data": ... }`. On error,
//! `data` carries a human-readable `message`.
//!
//! Screens talk to the backend through the [`Backend`] trait so they can be
//! driven by a fake in tests; [`http::HttpBackend`] is the real transport.

pub mod error;
pub mod http;

use std::fmt;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{DeskError, Result};
use crate::session::Session;
use crate::types::{CurrencyPrice, Message, Store, Ticket, Urgency};

pub use http::HttpBackend;

/// Named backend operations and the paths they are posted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListTickets,
    ListTicketMessages,
    CreateTicket,
    CreateTicketMessage,
    CloseTicket,
    ListStores,
    CreateStore,
    CurrencyPrice,
    CheckRecoveryToken,
    UpdatePassword,
    SubmitContact,
}

impl Operation {
    pub fn path(self) -> &'static str {
        match self {
            Operation::ListTickets => "ticket/all",
            Operation::ListTicketMessages => "ticket/messages",
            Operation::CreateTicket => "ticket/create",
            Operation::CreateTicketMessage => "ticket/message/create",
            Operation::CloseTicket => "ticket/close",
            Operation::ListStores => "store/all",
            Operation::CreateStore => "store/create",
            Operation::CurrencyPrice => "currency/price",
            Operation::CheckRecoveryToken => "user/recovery/check",
            Operation::UpdatePassword => "user/recovery/update",
            Operation::SubmitContact => "landing/contact",
        }
    }

    /// Anonymous operations are sent without a session token.
    pub fn is_anonymous(self) -> bool {
        matches!(self, Operation::SubmitContact)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Error,
}

/// Response envelope shared by every operation
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub result: Outcome,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    /// Parse a raw response body.
    pub fn parse(operation: Operation, body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| DeskError::Decode {
            operation: operation.to_string(),
            reason: e.to_string(),
        })
    }

    /// Unwrap the payload, turning `result: "error"` into [`DeskError::Rejected`].
    pub fn into_data<T: DeserializeOwned>(self, operation: Operation) -> Result<T> {
        match self.result {
            Outcome::Success => serde_json::from_value(self.data).map_err(|e| DeskError::Decode {
                operation: operation.to_string(),
                reason: e.to_string(),
            }),
            Outcome::Error => Err(DeskError::Rejected(rejection_message(&self.data))),
        }
    }

    /// Like [`Envelope::into_data`] for operations whose payload is ignored.
    pub fn into_unit(self) -> Result<()> {
        match self.result {
            Outcome::Success => Ok(()),
            Outcome::Error => Err(DeskError::Rejected(rejection_message(&self.data))),
        }
    }
}

fn rejection_message(data: &serde_json::Value) -> String {
    data.get("message")
        .and_then(|m| m.as_str())
        .or_else(|| data.as_str())
        .filter(|m| !m.trim().is_empty())
        .unwrap_or("Request failed")
        .to_string()
}

/// Fields of a new ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub title: String,
    pub message: String,
    pub urgency: Urgency,
}

/// Fields of a new store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStore {
    pub name: String,
    pub url: Option<String>,
}

/// Anonymous landing-page contact submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Common interface for the gateway backend
pub trait Backend: Send + Sync {
    /// All tickets belonging to the session, in backend order
    fn list_tickets(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<Vec<Ticket>>> + Send;

    /// A ticket's thread, newest first as the backend sends it
    fn list_ticket_messages(
        &self,
        session: &Session,
        ticket_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Message>>> + Send;

    fn create_ticket(
        &self,
        session: &Session,
        ticket: &NewTicket,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn create_ticket_message(
        &self,
        session: &Session,
        ticket_id: &str,
        message: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn close_ticket(
        &self,
        session: &Session,
        ticket_id: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn list_stores(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<Vec<Store>>> + Send;

    fn create_store(
        &self,
        session: &Session,
        store: &NewStore,
    ) -> impl std::future::Future<Output = Result<Store>> + Send;

    fn currency_price(
        &self,
        session: &Session,
        currency: &str,
        fiat: &str,
    ) -> impl std::future::Future<Output = Result<CurrencyPrice>> + Send;

    /// Check a password-recovery token. The recovery token is the credential.
    fn check_recovery_token(
        &self,
        recovery_token: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn update_password(
        &self,
        recovery_token: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn submit_contact(
        &self,
        form: &ContactForm,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_decodes_payload() {
        let body = r#"{"result":"success","data":[{"name":"support","message":"hi","dateCreated":"2024-01-01"}]}"#;
        let messages: Vec<Message> = Envelope::parse(Operation::ListTicketMessages, body)
            .unwrap()
            .into_data(Operation::ListTicketMessages)
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_from_support());
    }

    #[test]
    fn test_error_envelope_surfaces_message() {
        let body = r#"{"result":"error","data":{"message":"Ticket is closed"}}"#;
        let err = Envelope::parse(Operation::CreateTicketMessage, body)
            .unwrap()
            .into_unit()
            .unwrap_err();
        assert!(matches!(err, DeskError::Rejected(ref m) if m == "Ticket is closed"));
    }

    #[test]
    fn test_error_envelope_without_message_has_fallback() {
        let body = r#"{"result":"error"}"#;
        let err = Envelope::parse(Operation::CloseTicket, body)
            .unwrap()
            .into_unit()
            .unwrap_err();
        assert_eq!(err.to_string(), "Request failed");
    }

    #[test]
    fn test_garbage_body_is_decode_error() {
        let err = Envelope::parse(Operation::ListTickets, "<html>502</html>").unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("ticket/all"));
    }

    #[test]
    fn test_payload_shape_mismatch_is_decode_error() {
        let body = r#"{"result":"success","data":{"unexpected":true}}"#;
        let err = Envelope::parse(Operation::ListTickets, body)
            .unwrap()
            .into_data::<Vec<Ticket>>(Operation::ListTickets)
            .unwrap_err();
        assert!(matches!(err, DeskError::Decode { .. }));
    }

    #[test]
    fn test_only_contact_is_anonymous() {
        assert!(Operation::SubmitContact.is_anonymous());
        assert!(!Operation::ListTickets.is_anonymous());
        assert!(!Operation::CheckRecoveryToken.is_anonymous());
    }
}
