//! Ticket list loading.
//!
//! [`TicketList`] owns what the list screen shows: the load state, the sorted
//! tickets and the pager. Every load is stamped with a generation number and
//! only the response to the most recent request is applied, so a double
//! reload can never leave an older list on screen.
//!
//! A failed load keeps the previous list and is not surfaced to the user;
//! it is logged and the loading state is cleared.

use crate::api::Backend;
use crate::error::{DeskError, Result};
use crate::session::Session;
use crate::types::Ticket;

use super::paging::Pager;
use super::sort::sort_tickets;

/// Identifies one in-flight list request
pub type Generation = u64;

/// Where the list currently stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A request is outstanding; `previous` is what stays on screen meanwhile
    Loading {
        generation: Generation,
        previous: Option<Vec<Ticket>>,
    },
    /// Sorted tickets from the latest successful load
    Loaded(Vec<Ticket>),
    /// The latest load failed; `previous` is still displayed
    Failed { previous: Option<Vec<Ticket>> },
}

/// What happened to a finished request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// A newer request was issued after this one; its response was dropped
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct TicketList {
    state: LoadState,
    latest: Generation,
    pager: Pager,
}

impl TicketList {
    pub fn new(page_size: usize) -> Self {
        Self {
            pager: Pager::new(page_size),
            ..Default::default()
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    /// Tickets currently displayed, in display order
    pub fn tickets(&self) -> &[Ticket] {
        match &self.state {
            LoadState::Idle => &[],
            LoadState::Loaded(tickets) => tickets,
            LoadState::Loading { previous, .. } | LoadState::Failed { previous } => {
                previous.as_deref().unwrap_or(&[])
            }
        }
    }

    pub fn pager(&self) -> Pager {
        self.pager
    }

    /// Rows revealed by the pager
    pub fn visible(&self) -> &[Ticket] {
        self.pager.visible(self.tickets())
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more(self.tickets().len())
    }

    pub fn load_more(&mut self) -> bool {
        let total = self.tickets().len();
        self.pager.load_more(total)
    }

    pub fn find(&self, ticket_id: &str) -> Option<&Ticket> {
        self.tickets().iter().find(|t| t.ticket_id == ticket_id)
    }

    /// Mark a new request as outstanding and return its generation.
    pub fn begin_load(&mut self) -> Generation {
        self.latest += 1;
        let previous = self.displayed_snapshot();
        self.state = LoadState::Loading {
            generation: self.latest,
            previous,
        };
        tracing::debug!(generation = self.latest, "ticket list load started");
        self.latest
    }

    /// Apply the response to request `generation`.
    pub fn finish_load(
        &mut self,
        generation: Generation,
        result: Result<Vec<Ticket>>,
    ) -> LoadOutcome {
        if generation != self.latest {
            tracing::debug!(generation, latest = self.latest, "dropping stale ticket list");
            return LoadOutcome::Stale;
        }

        match result {
            Ok(tickets) => {
                tracing::info!(count = tickets.len(), "ticket list loaded");
                self.state = LoadState::Loaded(sort_tickets(&tickets));
                self.pager.reset();
                LoadOutcome::Applied
            }
            Err(e) => {
                log_silent_failure(&e);
                let previous = self.displayed_snapshot();
                self.state = LoadState::Failed { previous };
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch and apply in one step.
    pub async fn reload<B: Backend>(&mut self, backend: &B, session: &Session) -> LoadOutcome {
        let generation = self.begin_load();
        let result = backend.list_tickets(session).await;
        self.finish_load(generation, result)
    }

    fn displayed_snapshot(&self) -> Option<Vec<Ticket>> {
        match &self.state {
            LoadState::Idle => None,
            LoadState::Loaded(tickets) => Some(tickets.clone()),
            LoadState::Loading { previous, .. } | LoadState::Failed { previous } => {
                previous.clone()
            }
        }
    }
}

fn log_silent_failure(error: &DeskError) {
    if error.is_transport() {
        tracing::warn!("failed to load tickets: {error}");
    } else {
        tracing::warn!("tickets request rejected: {error}");
    }
}

/// Fetch all tickets for the session in display order.
///
/// Unlike [`TicketList::reload`] this propagates the error, for callers
/// that want to report it.
pub async fn fetch_sorted_tickets<B: Backend>(backend: &B, session: &Session) -> Result<Vec<Ticket>> {
    let tickets = backend.list_tickets(session).await?;
    Ok(sort_tickets(&tickets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Urgency;

    fn ticket(id: &str, active: bool, urgency: Urgency, updated: &str) -> Ticket {
        Ticket {
            ticket_id: id.to_string(),
            title: id.to_string(),
            date_created: "2024-01-01".to_string(),
            date_updated: updated.to_string(),
            is_active: active,
            urgency,
            last_reply: String::new(),
        }
    }

    fn many(n: usize) -> Vec<Ticket> {
        (0..n)
            .map(|i| ticket(&format!("t{i:02}"), true, Urgency::Normal, "2024-01-01"))
            .collect()
    }

    #[test]
    fn test_idle_shows_nothing() {
        let list = TicketList::new(10);
        assert!(list.tickets().is_empty());
        assert!(!list.is_loading());
        assert_eq!(list.state(), &LoadState::Idle);
    }

    #[test]
    fn test_successful_load_sorts() {
        let mut list = TicketList::new(10);
        let generation = list.begin_load();
        assert!(list.is_loading());

        let outcome = list.finish_load(
            generation,
            Ok(vec![
                ticket("closed", false, Urgency::Critical, "2024-06-01"),
                ticket("crit", true, Urgency::Critical, "2024-01-01"),
            ]),
        );

        assert_eq!(outcome, LoadOutcome::Applied);
        assert!(!list.is_loading());
        let ids: Vec<_> = list.tickets().iter().map(|t| t.ticket_id.as_str()).collect();
        assert_eq!(ids, vec!["crit", "closed"]);
    }

    #[test]
    fn test_failure_keeps_previous_list() {
        let mut list = TicketList::new(10);
        let first = list.begin_load();
        list.finish_load(first, Ok(many(3)));

        let second = list.begin_load();
        assert_eq!(list.tickets().len(), 3, "previous list stays during reload");

        let outcome = list.finish_load(second, Err(DeskError::Timeout("ticket/all".into())));
        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(!list.is_loading());
        assert_eq!(list.tickets().len(), 3);
    }

    #[test]
    fn test_failure_on_first_load_is_empty() {
        let mut list = TicketList::new(10);
        let generation = list.begin_load();
        list.finish_load(generation, Err(DeskError::Rejected("nope".into())));
        assert!(list.tickets().is_empty());
        assert_eq!(list.state(), &LoadState::Failed { previous: None });
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut list = TicketList::new(10);
        let older = list.begin_load();
        let newer = list.begin_load();

        assert_eq!(list.finish_load(newer, Ok(many(2))), LoadOutcome::Applied);
        assert_eq!(list.finish_load(older, Ok(many(9))), LoadOutcome::Stale);
        assert_eq!(list.tickets().len(), 2);
    }

    #[test]
    fn test_stale_response_does_not_end_loading() {
        let mut list = TicketList::new(10);
        let older = list.begin_load();
        let _newer = list.begin_load();

        assert_eq!(list.finish_load(older, Ok(many(4))), LoadOutcome::Stale);
        assert!(list.is_loading());
    }

    #[test]
    fn test_reload_resets_pager() {
        let mut list = TicketList::new(10);
        let generation = list.begin_load();
        list.finish_load(generation, Ok(many(25)));
        assert!(list.load_more());
        assert_eq!(list.visible().len(), 20);

        let generation = list.begin_load();
        list.finish_load(generation, Ok(many(25)));
        assert_eq!(list.visible().len(), 10);
    }

    #[test]
    fn test_pagination_through_list() {
        let mut list = TicketList::new(10);
        let generation = list.begin_load();
        list.finish_load(generation, Ok(many(25)));

        assert_eq!(list.visible().len(), 10);
        assert!(list.has_more());
        list.load_more();
        list.load_more();
        assert_eq!(list.visible().len(), 25);
        assert!(!list.has_more());
        assert!(!list.load_more());
    }

    #[test]
    fn test_find_by_id() {
        let mut list = TicketList::new(10);
        let generation = list.begin_load();
        list.finish_load(generation, Ok(many(3)));
        assert!(list.find("t01").is_some());
        assert!(list.find("missing").is_none());
    }
}
