//! reqwest-backed implementation of the gateway backend.
//!
//! # Security Note - Logging
//!
//! The session token travels in the JSON body, never in a URL or header,
//! and request logging below only records the operation name. Do not enable
//! `RUST_LOG=reqwest=trace` in production: it may dump request bodies.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::config::Config;
use crate::error::Result;
use crate::session::Session;
use crate::types::{CurrencyPrice, Message, Store, Ticket};

use super::error::ApiError;
use super::{Backend, ContactForm, Envelope, NewStore, NewTicket, Operation};

/// HTTP transport for the gateway API
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a backend from configuration
    ///
    /// Configures the HTTP client with the configured request timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, config.api_url()?))
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url: normalize_base(base_url),
        }
    }

    /// Absolute URL an operation is posted to
    pub fn endpoint(&self, operation: Operation) -> Result<Url> {
        Ok(self.base_url.join(operation.path())?)
    }

    async fn post(&self, operation: Operation, body: Value) -> Result<Envelope> {
        let url = self.endpoint(operation)?;
        tracing::debug!(%operation, "sending request");

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(operation, &e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::from_reqwest(operation, &e))?;

        // Business errors may come back with a 4xx status and a valid envelope.
        match Envelope::parse(operation, &text) {
            Ok(envelope) => {
                tracing::debug!(%operation, status = status.as_u16(), result = ?envelope.result, "response");
                Ok(envelope)
            }
            Err(_) if !status.is_success() => Err(ApiError::with_status(operation, status).into()),
            Err(e) => Err(e),
        }
    }

    async fn call<T: DeserializeOwned>(&self, operation: Operation, body: Value) -> Result<T> {
        self.post(operation, body).await?.into_data(operation)
    }

    async fn call_unit(&self, operation: Operation, body: Value) -> Result<()> {
        self.post(operation, body).await?.into_unit()
    }
}

/// `Url::join` drops the last path segment unless the base ends in '/'.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

impl Backend for HttpBackend {
    async fn list_tickets(&self, session: &Session) -> Result<Vec<Ticket>> {
        self.call(Operation::ListTickets, json!({ "token": session.token() }))
            .await
    }

    async fn list_ticket_messages(&self, session: &Session, ticket_id: &str) -> Result<Vec<Message>> {
        self.call(
            Operation::ListTicketMessages,
            json!({ "token": session.token(), "ticketId": ticket_id }),
        )
        .await
    }

    async fn create_ticket(&self, session: &Session, ticket: &NewTicket) -> Result<()> {
        self.call_unit(
            Operation::CreateTicket,
            json!({
                "token": session.token(),
                "title": ticket.title,
                "message": ticket.message,
                "urgency": ticket.urgency.as_num(),
            }),
        )
        .await
    }

    async fn create_ticket_message(
        &self,
        session: &Session,
        ticket_id: &str,
        message: &str,
    ) -> Result<()> {
        self.call_unit(
            Operation::CreateTicketMessage,
            json!({ "token": session.token(), "ticketId": ticket_id, "message": message }),
        )
        .await
    }

    async fn close_ticket(&self, session: &Session, ticket_id: &str) -> Result<()> {
        self.call_unit(
            Operation::CloseTicket,
            json!({ "token": session.token(), "ticketId": ticket_id }),
        )
        .await
    }

    async fn list_stores(&self, session: &Session) -> Result<Vec<Store>> {
        self.call(Operation::ListStores, json!({ "token": session.token() }))
            .await
    }

    async fn create_store(&self, session: &Session, store: &NewStore) -> Result<Store> {
        let mut body = json!({ "token": session.token(), "name": store.name });
        if let Some(url) = &store.url {
            body["url"] = Value::String(url.clone());
        }
        self.call(Operation::CreateStore, body).await
    }

    async fn currency_price(
        &self,
        session: &Session,
        currency: &str,
        fiat: &str,
    ) -> Result<CurrencyPrice> {
        self.call(
            Operation::CurrencyPrice,
            json!({ "token": session.token(), "currency": currency, "fiat": fiat }),
        )
        .await
    }

    async fn check_recovery_token(&self, recovery_token: &str) -> Result<()> {
        self.call_unit(
            Operation::CheckRecoveryToken,
            json!({ "token": recovery_token }),
        )
        .await
    }

    async fn update_password(&self, recovery_token: &str, password: &str) -> Result<()> {
        self.call_unit(
            Operation::UpdatePassword,
            json!({ "token": recovery_token, "password": password }),
        )
        .await
    }

    async fn submit_contact(&self, form: &ContactForm) -> Result<()> {
        self.call_unit(
            Operation::SubmitContact,
            json!({ "name": form.name, "email": form.email, "message": form.message }),
        )
        .await
    }
}
