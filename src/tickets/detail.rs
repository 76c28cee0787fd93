//! Ticket detail screen: new-ticket form or an existing ticket's thread.
//!
//! [`DetailScreen`] is a plain state machine. User actions return a
//! [`DetailRequest`] for the caller to run against the backend, and the
//! result is fed back through [`DetailScreen::finish`], which says what to
//! do next. Validation happens before a request is produced, so an invalid
//! submit never reaches the network.

use crate::api::{Backend, NewTicket};
use crate::error::{DeskError, Result};
use crate::session::Session;
use crate::types::{Message, Urgency};

use super::loader::Generation;

pub const EMPTY_MESSAGE_ERROR: &str = "Message cannot be empty";
pub const EMPTY_TITLE_ERROR: &str = "Title cannot be empty";

/// Backend thread order is newest first; the screen shows oldest first.
///
/// Applied exactly once to each fetched payload.
pub fn thread_order(fetched: Vec<Message>) -> Vec<Message> {
    let mut messages = fetched;
    messages.reverse();
    messages
}

/// Fields of the new-ticket form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: String,
    pub urgency: Urgency,
    pub message: String,
}

impl TicketDraft {
    /// Check the form and build the request payload
    pub fn validate(&self) -> Result<NewTicket> {
        if self.title.trim().is_empty() {
            return Err(DeskError::Validation(EMPTY_TITLE_ERROR.to_string()));
        }
        Ok(NewTicket {
            title: self.title.trim().to_string(),
            message: validate_message(&self.message)?,
            urgency: self.urgency,
        })
    }
}

/// Trimmed message text, or a validation error when it is blank
pub fn validate_message(text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DeskError::Validation(EMPTY_MESSAGE_ERROR.to_string()));
    }
    Ok(text.to_string())
}

/// Thread of an existing ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadState {
    Loading { generation: Generation },
    Ready(Vec<Message>),
    /// Fetch failed; whatever was shown before stays
    Failed(Vec<Message>),
}

impl ThreadState {
    pub fn messages(&self) -> &[Message] {
        match self {
            ThreadState::Loading { .. } => &[],
            ThreadState::Ready(messages) | ThreadState::Failed(messages) => messages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketThread {
    pub ticket_id: String,
    pub thread: ThreadState,
    /// Reply being composed
    pub reply: String,
    shown: Vec<Message>,
}

impl TicketThread {
    /// Messages on screen, oldest first
    pub fn messages(&self) -> &[Message] {
        match &self.thread {
            ThreadState::Loading { .. } => &self.shown,
            other => other.messages(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailMode {
    Creating(TicketDraft),
    Viewing(TicketThread),
}

/// Action currently waiting on the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Create,
    Reply,
    Close,
}

/// Work for the caller to send to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailRequest {
    FetchThread {
        ticket_id: String,
        generation: Generation,
    },
    Create(NewTicket),
    Reply {
        ticket_id: String,
        message: String,
    },
    Close {
        ticket_id: String,
    },
}

/// Backend answer to a [`DetailRequest`]
#[derive(Debug)]
pub enum DetailResponse {
    Thread(Result<Vec<Message>>),
    Done(Result<()>),
}

/// What the caller should do after a request finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEffect {
    None,
    /// Go back to the ticket list (and reload it)
    BackToList,
    /// Run another request, e.g. re-fetch the thread after a reply
    Follow(DetailRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailScreen {
    mode: DetailMode,
    pending: Option<Pending>,
    error: Option<String>,
    latest: Generation,
}

impl DetailScreen {
    /// Screen with an empty new-ticket form
    pub fn creating() -> Self {
        Self {
            mode: DetailMode::Creating(TicketDraft::default()),
            pending: None,
            error: None,
            latest: 0,
        }
    }

    /// Screen for an existing ticket, together with the initial thread fetch
    pub fn viewing(ticket_id: impl Into<String>) -> (Self, DetailRequest) {
        Self::viewing_after(ticket_id, 0)
    }

    /// Like [`DetailScreen::viewing`], numbering thread fetches after `last`.
    ///
    /// Callers that reopen tickets pass the last generation an earlier
    /// screen issued, so a fetch still in flight from that screen can never
    /// be taken for this one's.
    pub fn viewing_after(ticket_id: impl Into<String>, last: Generation) -> (Self, DetailRequest) {
        let ticket_id = ticket_id.into();
        let generation = last + 1;
        let screen = Self {
            mode: DetailMode::Viewing(TicketThread {
                ticket_id: ticket_id.clone(),
                thread: ThreadState::Loading { generation },
                reply: String::new(),
                shown: Vec::new(),
            }),
            pending: None,
            error: None,
            latest: generation,
        };
        let request = DetailRequest::FetchThread {
            ticket_id,
            generation,
        };
        (screen, request)
    }

    /// Newest thread fetch generation this screen has issued
    pub fn latest_generation(&self) -> Generation {
        self.latest
    }

    pub fn mode(&self) -> &DetailMode {
        &self.mode
    }

    /// Inline error (validation or backend message)
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    /// True while a create/reply/close is outstanding; controls are disabled
    pub fn is_sending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn ticket_id(&self) -> Option<&str> {
        match &self.mode {
            DetailMode::Viewing(thread) => Some(&thread.ticket_id),
            DetailMode::Creating(_) => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut TicketDraft> {
        match &mut self.mode {
            DetailMode::Creating(draft) => Some(draft),
            DetailMode::Viewing(_) => None,
        }
    }

    pub fn reply_mut(&mut self) -> Option<&mut String> {
        match &mut self.mode {
            DetailMode::Viewing(thread) => Some(&mut thread.reply),
            DetailMode::Creating(_) => None,
        }
    }

    /// Re-fetch the thread, superseding any fetch still in flight
    pub fn refresh(&mut self) -> Option<DetailRequest> {
        let DetailMode::Viewing(thread) = &mut self.mode else {
            return None;
        };
        self.latest += 1;
        let shown = thread.messages().to_vec();
        thread.shown = shown;
        thread.thread = ThreadState::Loading {
            generation: self.latest,
        };
        Some(DetailRequest::FetchThread {
            ticket_id: thread.ticket_id.clone(),
            generation: self.latest,
        })
    }

    /// Submit the new-ticket form
    pub fn submit_create(&mut self) -> Option<DetailRequest> {
        if self.is_sending() {
            return None;
        }
        let DetailMode::Creating(draft) = &self.mode else {
            return None;
        };
        match draft.validate() {
            Ok(ticket) => {
                self.error = None;
                self.pending = Some(Pending::Create);
                Some(DetailRequest::Create(ticket))
            }
            Err(e) => {
                self.error = e.inline_message().map(str::to_string);
                None
            }
        }
    }

    /// Submit the composed reply
    pub fn submit_reply(&mut self) -> Option<DetailRequest> {
        if self.is_sending() {
            return None;
        }
        let DetailMode::Viewing(thread) = &self.mode else {
            return None;
        };
        let message = match validate_message(&thread.reply) {
            Ok(message) => message,
            Err(e) => {
                self.error = e.inline_message().map(str::to_string);
                return None;
            }
        };
        let request = DetailRequest::Reply {
            ticket_id: thread.ticket_id.clone(),
            message,
        };
        self.error = None;
        self.pending = Some(Pending::Reply);
        Some(request)
    }

    /// Close the ticket; no message required
    pub fn submit_close(&mut self) -> Option<DetailRequest> {
        if self.is_sending() {
            return None;
        }
        let ticket_id = self.ticket_id()?.to_string();
        self.error = None;
        self.pending = Some(Pending::Close);
        Some(DetailRequest::Close { ticket_id })
    }

    /// Whether `request` is the create/reply/close this screen is waiting on
    fn is_awaiting(&self, request: &DetailRequest) -> bool {
        match (request, self.pending, &self.mode) {
            (DetailRequest::Create(_), Some(Pending::Create), DetailMode::Creating(_)) => true,
            (DetailRequest::Reply { ticket_id, .. }, Some(Pending::Reply), _)
            | (DetailRequest::Close { ticket_id }, Some(Pending::Close), _) => {
                self.ticket_id() == Some(ticket_id.as_str())
            }
            _ => false,
        }
    }

    /// Feed back the result of `request`.
    ///
    /// A create/reply/close answer is only applied when it is the action
    /// this screen is waiting on; anything else leaves the screen untouched.
    pub fn finish(&mut self, request: &DetailRequest, response: DetailResponse) -> DetailEffect {
        let is_fetch = matches!(request, DetailRequest::FetchThread { .. });
        if !is_fetch && !self.is_awaiting(request) {
            tracing::debug!(?request, pending = ?self.pending, "dropping unexpected response");
            return DetailEffect::None;
        }
        match (request, response) {
            (DetailRequest::FetchThread { ticket_id, generation }, DetailResponse::Thread(result)) => {
                self.finish_fetch(ticket_id, *generation, result);
                DetailEffect::None
            }
            (DetailRequest::Create(_), DetailResponse::Done(result)) => {
                self.pending = None;
                match result {
                    Ok(()) => {
                        tracing::info!("ticket created");
                        self.mode = DetailMode::Creating(TicketDraft::default());
                        DetailEffect::BackToList
                    }
                    Err(e) => {
                        self.record_failure("create ticket", e);
                        DetailEffect::None
                    }
                }
            }
            (DetailRequest::Reply { .. }, DetailResponse::Done(result)) => {
                self.pending = None;
                match result {
                    Ok(()) => {
                        if let Some(reply) = self.reply_mut() {
                            reply.clear();
                        }
                        self.refresh().map_or(DetailEffect::None, DetailEffect::Follow)
                    }
                    Err(e) => {
                        self.record_failure("reply", e);
                        DetailEffect::None
                    }
                }
            }
            (DetailRequest::Close { ticket_id }, DetailResponse::Done(result)) => {
                self.pending = None;
                match result {
                    Ok(()) => {
                        tracing::info!(%ticket_id, "ticket closed");
                        DetailEffect::BackToList
                    }
                    Err(e) => {
                        self.record_failure("close ticket", e);
                        DetailEffect::None
                    }
                }
            }
            (request, _) => {
                tracing::warn!(?request, "response does not match request");
                self.pending = None;
                DetailEffect::None
            }
        }
    }

    fn finish_fetch(&mut self, ticket_id: &str, generation: Generation, result: Result<Vec<Message>>) {
        let DetailMode::Viewing(thread) = &mut self.mode else {
            return;
        };
        if thread.ticket_id != ticket_id || generation != self.latest {
            tracing::debug!(%ticket_id, generation, "dropping stale thread");
            return;
        }
        match result {
            Ok(fetched) => {
                thread.thread = ThreadState::Ready(thread_order(fetched));
            }
            Err(e) => {
                let shown = std::mem::take(&mut thread.shown);
                thread.thread = ThreadState::Failed(shown);
                self.record_failure("load thread", e);
            }
        }
    }

    /// Business and validation errors go inline; transport failures are
    /// only logged.
    fn record_failure(&mut self, action: &str, error: DeskError) {
        match error.inline_message() {
            Some(msg) => self.error = Some(msg.to_string()),
            None => tracing::warn!("{action} failed: {error}"),
        }
    }

    /// Run `request` and every follow-up it triggers.
    ///
    /// Returns the final effect other than [`DetailEffect::Follow`].
    pub async fn drive<B: Backend>(
        &mut self,
        backend: &B,
        session: &Session,
        request: DetailRequest,
    ) -> DetailEffect {
        let mut request = request;
        loop {
            let response = execute(backend, session, &request).await;
            match self.finish(&request, response) {
                DetailEffect::Follow(next) => request = next,
                effect => return effect,
            }
        }
    }
}

/// Send a detail request to the backend
pub async fn execute<B: Backend>(
    backend: &B,
    session: &Session,
    request: &DetailRequest,
) -> DetailResponse {
    match request {
        DetailRequest::FetchThread { ticket_id, .. } => {
            DetailResponse::Thread(backend.list_ticket_messages(session, ticket_id).await)
        }
        DetailRequest::Create(ticket) => {
            DetailResponse::Done(backend.create_ticket(session, ticket).await)
        }
        DetailRequest::Reply { ticket_id, message } => DetailResponse::Done(
            backend
                .create_ticket_message(session, ticket_id, message)
                .await,
        ),
        DetailRequest::Close { ticket_id } => {
            DetailResponse::Done(backend.close_ticket(session, ticket_id).await)
        }
    }
}
