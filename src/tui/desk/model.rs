//! Support desk model types for testable state management
//!
//! State ([`DeskState`]) and rendering data ([`DeskViewModel`]) are kept
//! apart so every transition can be unit tested without iocraft. The
//! reducer never performs I/O; it returns a [`DeskEffect`] that the
//! component runs asynchronously and feeds back through the `finish_*`
//! methods.

use std::time::Instant;

use iocraft::prelude::{KeyCode, KeyModifiers};
use jiff::civil::Date;

use crate::display::{COMPACT_WIDTH, days_ago, format_date};
use crate::error::Result;
use crate::tickets::{
    Bucket, DetailEffect, DetailMode, DetailRequest, DetailResponse, DetailScreen, Generation,
    LoadOutcome, ThreadState, TicketList, bucket_counts,
};
use crate::tui::components::{Shortcut, Toast};
use crate::types::{Ticket, TicketStatus, Urgency};

// ============================================================================
// State Types
// ============================================================================

/// Which screen is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail(DetailScreen),
}

/// Focused field of the new-ticket form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Title,
    Message,
}

/// Table layout; narrow terminals drop secondary columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Compact,
    Wide,
}

impl Layout {
    pub fn for_width(width: u16) -> Self {
        if width < COMPACT_WIDTH {
            Layout::Compact
        } else {
            Layout::Wide
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeskState {
    pub list: TicketList,
    /// Index into the visible rows
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub screen: Screen,
    /// Active field when creating a ticket
    pub field: Field,
    /// Reply input has focus (viewing a ticket)
    pub composing: bool,
    pub toast: Option<Toast>,
    pub should_exit: bool,
    /// Last thread fetch generation issued by any detail screen
    pub detail_generation: Generation,
}

impl DeskState {
    pub fn new(page_size: usize) -> Self {
        Self {
            list: TicketList::new(page_size),
            selected_index: 0,
            scroll_offset: 0,
            screen: Screen::List,
            field: Field::Title,
            composing: false,
            toast: None,
            should_exit: false,
            detail_generation: 0,
        }
    }

    pub fn selected_ticket(&self) -> Option<&Ticket> {
        self.list.visible().get(self.selected_index)
    }

    pub fn detail(&self) -> Option<&DetailScreen> {
        match &self.screen {
            Screen::Detail(screen) => Some(screen),
            Screen::List => None,
        }
    }

    /// Open the thread of `ticket_id`, returning its first fetch
    fn open_ticket(&mut self, ticket_id: String) -> DeskEffect {
        let (screen, request) = DetailScreen::viewing_after(ticket_id, self.detail_generation);
        self.detail_generation = screen.latest_generation();
        self.screen = Screen::Detail(screen);
        self.composing = false;
        DeskEffect::Detail(request)
    }

    /// Return to the list, remembering how far the detail screen numbered
    /// its fetches.
    fn leave_detail(&mut self) {
        if let Screen::Detail(screen) = &self.screen {
            self.detail_generation = self.detail_generation.max(screen.latest_generation());
        }
        self.screen = Screen::List;
        self.composing = false;
    }

    /// Start a list load and return the request to run
    pub fn begin_reload(&mut self) -> DeskEffect {
        DeskEffect::LoadTickets(self.list.begin_load())
    }

    /// Apply a finished list load.
    pub fn finish_list_load(
        &mut self,
        generation: Generation,
        result: Result<Vec<Ticket>>,
    ) -> LoadOutcome {
        let outcome = self.list.finish_load(generation, result);
        if outcome == LoadOutcome::Applied {
            let visible = self.list.visible().len();
            self.selected_index = self.selected_index.min(visible.saturating_sub(1));
            self.scroll_offset = self.scroll_offset.min(self.selected_index);
        }
        outcome
    }

    /// Apply a finished detail request. Returns the follow-up to run, if any.
    ///
    /// Responses for a screen the user already left are dropped.
    pub fn finish_detail(
        &mut self,
        request: &DetailRequest,
        response: DetailResponse,
    ) -> Option<DeskEffect> {
        let Screen::Detail(screen) = &mut self.screen else {
            tracing::debug!(?request, "detail screen closed, dropping response");
            return None;
        };
        match screen.finish(request, response) {
            DetailEffect::None => None,
            DetailEffect::Follow(next) => {
                self.composing = false;
                Some(DeskEffect::Detail(next))
            }
            DetailEffect::BackToList => {
                let message = match request {
                    DetailRequest::Create(_) => "Ticket created",
                    _ => "Ticket closed",
                };
                self.toast = Some(Toast::success(message));
                self.leave_detail();
                Some(self.begin_reload())
            }
        }
    }

    /// Record the outcome of a clipboard copy
    pub fn copied(&mut self, ticket_id: &str, result: Result<()>) {
        self.toast = Some(match result {
            Ok(()) => Toast::success(format!("Copied {ticket_id}")),
            Err(e) => {
                tracing::warn!("{e}");
                Toast::error(e.to_string())
            }
        });
    }

    /// Drop the toast once it has been visible long enough
    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }
}

// ============================================================================
// Action Types
// ============================================================================

/// User actions on the desk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeskAction {
    MoveUp,
    MoveDown,
    LoadMore,
    Reload,
    Open,
    NewTicket,
    StartReply,
    CloseTicket,
    CopyId,
    Back,
    Quit,
    Input(char),
    Backspace,
    NextField,
    CycleSeverity,
    Submit,
}

/// Side effect requested by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeskEffect {
    LoadTickets(Generation),
    Detail(DetailRequest),
    CopyToClipboard(String),
}

// ============================================================================
// View Model Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct DeskViewModel {
    pub layout: Layout,
    pub header: HeaderViewModel,
    pub list: ListViewModel,
    pub detail: Option<DetailViewModel>,
    pub toast: Option<Toast>,
    pub shortcuts: Vec<Shortcut>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderViewModel {
    pub total: usize,
    pub counts: [(Bucket, usize); 4],
    pub is_loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewModel {
    /// Rows inside the scroll window
    pub rows: Vec<TicketRowViewModel>,
    pub visible_count: usize,
    pub total: usize,
    pub has_more: bool,
    pub scroll_offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRowViewModel {
    pub ticket_id: String,
    pub title: String,
    pub severity: Urgency,
    pub status: TicketStatus,
    /// Formatted `dateUpdated`; absent in the compact layout
    pub updated: Option<String>,
    pub age: String,
    /// Who the ticket waits on; absent in the compact layout
    pub reply: Option<String>,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageViewModel {
    pub sender: String,
    pub from_support: bool,
    pub date: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailViewModel {
    Creating {
        title: String,
        message: String,
        severity: Urgency,
        field: Field,
        error: Option<String>,
        sending: bool,
    },
    Viewing {
        ticket_id: String,
        ticket: Option<Ticket>,
        messages: Vec<MessageViewModel>,
        loading: bool,
        reply: String,
        composing: bool,
        error: Option<String>,
        sending: bool,
    },
}

// ============================================================================
// Pure Functions
// ============================================================================

/// Pure function: compute view model from state
pub fn compute_desk_view_model(
    state: &DeskState,
    list_height: usize,
    width: u16,
    today: Date,
) -> DeskViewModel {
    let layout = Layout::for_width(width);
    let tickets = state.list.tickets();
    let visible = state.list.visible();

    let rows = visible
        .iter()
        .enumerate()
        .skip(state.scroll_offset)
        .take(list_height.max(1))
        .map(|(i, t)| TicketRowViewModel {
            ticket_id: t.ticket_id.clone(),
            title: t.title.clone(),
            severity: t.urgency,
            status: t.status(),
            updated: (layout == Layout::Wide).then(|| format_date(&t.date_updated)),
            age: days_ago(&t.date_updated, today),
            reply: (layout == Layout::Wide).then(|| t.reply_label().to_string()),
            is_selected: i == state.selected_index,
        })
        .collect();

    let detail = state.detail().map(|screen| detail_view_model(state, screen));

    DeskViewModel {
        layout,
        header: HeaderViewModel {
            total: tickets.len(),
            counts: bucket_counts(tickets),
            is_loading: state.list.is_loading(),
        },
        list: ListViewModel {
            rows,
            visible_count: visible.len(),
            total: tickets.len(),
            has_more: state.list.has_more(),
            scroll_offset: state.scroll_offset,
        },
        detail,
        toast: state.toast.clone(),
        shortcuts: compute_shortcuts(state),
    }
}

fn detail_view_model(state: &DeskState, screen: &DetailScreen) -> DetailViewModel {
    let error = screen.error().map(str::to_string);
    let sending = screen.is_sending();
    match screen.mode() {
        DetailMode::Creating(draft) => DetailViewModel::Creating {
            title: draft.title.clone(),
            message: draft.message.clone(),
            severity: draft.urgency,
            field: state.field,
            error,
            sending,
        },
        DetailMode::Viewing(thread) => DetailViewModel::Viewing {
            ticket_id: thread.ticket_id.clone(),
            ticket: state.list.find(&thread.ticket_id).cloned(),
            messages: thread
                .messages()
                .iter()
                .map(|m| MessageViewModel {
                    sender: m.name.clone(),
                    from_support: m.is_from_support(),
                    date: format_date(&m.date_created),
                    text: m.message.clone(),
                })
                .collect(),
            loading: matches!(thread.thread, ThreadState::Loading { .. }),
            reply: thread.reply.clone(),
            composing: state.composing,
            error,
            sending,
        },
    }
}

/// Footer shortcuts for the current screen
pub fn compute_shortcuts(state: &DeskState) -> Vec<Shortcut> {
    match state.detail().map(DetailScreen::mode) {
        None => {
            let mut shortcuts = vec![
                Shortcut::new("j/k", "Navigate"),
                Shortcut::new("Enter", "Open"),
                Shortcut::new("n", "New Ticket"),
                Shortcut::new("r", "Reload"),
                Shortcut::new("y", "Copy ID"),
            ];
            if state.list.has_more() {
                shortcuts.push(Shortcut::new("m", "Load More"));
            }
            shortcuts.push(Shortcut::new("q", "Quit"));
            shortcuts
        }
        Some(DetailMode::Creating(_)) => vec![
            Shortcut::new("Tab", "Next Field"),
            Shortcut::new("C-p", "Severity"),
            Shortcut::new("Enter", "Submit"),
            Shortcut::new("Esc", "Back"),
        ],
        Some(DetailMode::Viewing(_)) if state.composing => vec![
            Shortcut::new("Enter", "Send"),
            Shortcut::new("Esc", "Cancel"),
        ],
        Some(DetailMode::Viewing(_)) => vec![
            Shortcut::new("R", "Reply"),
            Shortcut::new("c", "Close Ticket"),
            Shortcut::new("r", "Refresh"),
            Shortcut::new("y", "Copy ID"),
            Shortcut::new("Esc", "Back"),
            Shortcut::new("q", "Quit"),
        ],
    }
}

/// Pure function: apply an action to the desk state
///
/// Returns the new state and the effect the component must run, if any.
pub fn reduce_desk_state(
    mut state: DeskState,
    action: DeskAction,
    list_height: usize,
) -> (DeskState, Option<DeskEffect>) {
    if action == DeskAction::Quit {
        state.should_exit = true;
        return (state, None);
    }

    let effect = match &state.screen {
        Screen::List => reduce_list(&mut state, action, list_height),
        Screen::Detail(_) => reduce_detail(&mut state, action),
    };
    (state, effect)
}

fn reduce_list(state: &mut DeskState, action: DeskAction, list_height: usize) -> Option<DeskEffect> {
    let visible = state.list.visible().len();
    match action {
        DeskAction::MoveUp => {
            state.selected_index = state.selected_index.saturating_sub(1);
            state.scroll_offset =
                adjust_scroll(state.scroll_offset, state.selected_index, list_height);
            None
        }
        DeskAction::MoveDown => {
            if visible > 0 {
                state.selected_index = (state.selected_index + 1).min(visible - 1);
                state.scroll_offset =
                    adjust_scroll(state.scroll_offset, state.selected_index, list_height);
            }
            None
        }
        DeskAction::LoadMore => {
            state.list.load_more();
            None
        }
        DeskAction::Reload => Some(state.begin_reload()),
        DeskAction::Open => {
            let ticket_id = state.selected_ticket()?.ticket_id.clone();
            Some(state.open_ticket(ticket_id))
        }
        DeskAction::NewTicket => {
            state.screen = Screen::Detail(DetailScreen::creating());
            state.field = Field::Title;
            None
        }
        DeskAction::CopyId => state
            .selected_ticket()
            .map(|t| DeskEffect::CopyToClipboard(t.ticket_id.clone())),
        _ => None,
    }
}

fn reduce_detail(state: &mut DeskState, action: DeskAction) -> Option<DeskEffect> {
    let composing = state.composing;
    let field = state.field;
    let Screen::Detail(screen) = &mut state.screen else {
        return None;
    };
    let creating = matches!(screen.mode(), DetailMode::Creating(_));

    if action == DeskAction::Back {
        if composing {
            state.composing = false;
        } else {
            state.leave_detail();
        }
        return None;
    }

    if creating {
        return match action {
            DeskAction::Input(c) => {
                if let Some(draft) = screen.draft_mut() {
                    match field {
                        Field::Title => draft.title.push(c),
                        Field::Message => draft.message.push(c),
                    }
                }
                None
            }
            DeskAction::Backspace => {
                if let Some(draft) = screen.draft_mut() {
                    match field {
                        Field::Title => draft.title.pop(),
                        Field::Message => draft.message.pop(),
                    };
                }
                None
            }
            DeskAction::NextField => {
                state.field = match field {
                    Field::Title => Field::Message,
                    Field::Message => Field::Title,
                };
                None
            }
            DeskAction::CycleSeverity => {
                if let Some(draft) = screen.draft_mut() {
                    draft.urgency = draft.urgency.next();
                }
                None
            }
            DeskAction::Submit if field == Field::Title => {
                state.field = Field::Message;
                None
            }
            DeskAction::Submit => screen.submit_create().map(DeskEffect::Detail),
            _ => None,
        };
    }

    if composing {
        return match action {
            DeskAction::Input(c) => {
                if let Some(reply) = screen.reply_mut() {
                    reply.push(c);
                }
                None
            }
            DeskAction::Backspace => {
                if let Some(reply) = screen.reply_mut() {
                    reply.pop();
                }
                None
            }
            DeskAction::Submit => screen.submit_reply().map(DeskEffect::Detail),
            _ => None,
        };
    }

    match action {
        DeskAction::StartReply => {
            if !screen.is_sending() {
                state.composing = true;
            }
            None
        }
        DeskAction::CloseTicket => screen.submit_close().map(DeskEffect::Detail),
        DeskAction::Reload => screen.refresh().map(DeskEffect::Detail),
        DeskAction::CopyId => screen
            .ticket_id()
            .map(|id| DeskEffect::CopyToClipboard(id.to_string())),
        _ => None,
    }
}

/// Adjust scroll offset to keep selected item visible
pub fn adjust_scroll(scroll_offset: usize, selected_index: usize, list_height: usize) -> usize {
    if list_height == 0 {
        return 0;
    }
    if selected_index < scroll_offset {
        return selected_index;
    }
    if selected_index >= scroll_offset + list_height {
        return selected_index.saturating_sub(list_height - 1);
    }
    scroll_offset
}

/// Convert a key event to a DeskAction (pure function)
///
/// Text entry (new-ticket form, reply box) captures printable keys, so
/// shortcuts only apply outside of it.
pub fn key_to_action(
    code: KeyCode,
    modifiers: KeyModifiers,
    state: &DeskState,
) -> Option<DeskAction> {
    let text_entry = match state.detail().map(DetailScreen::mode) {
        Some(DetailMode::Creating(_)) => true,
        Some(DetailMode::Viewing(_)) => state.composing,
        None => false,
    };

    if text_entry {
        return match (code, modifiers) {
            (KeyCode::Esc, _) => Some(DeskAction::Back),
            (KeyCode::Enter, _) => Some(DeskAction::Submit),
            (KeyCode::Tab, _) => Some(DeskAction::NextField),
            (KeyCode::Backspace, _) => Some(DeskAction::Backspace),
            (KeyCode::Char('p'), m) if m.contains(KeyModifiers::CONTROL) => {
                Some(DeskAction::CycleSeverity)
            }
            (KeyCode::Char('q'), m) if m.contains(KeyModifiers::CONTROL) => Some(DeskAction::Quit),
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
                Some(DeskAction::Input(c))
            }
            _ => None,
        };
    }

    match code {
        KeyCode::Char('j') | KeyCode::Down => Some(DeskAction::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(DeskAction::MoveUp),
        KeyCode::Char('m') => Some(DeskAction::LoadMore),
        KeyCode::Char('r') => Some(DeskAction::Reload),
        KeyCode::Enter => Some(DeskAction::Open),
        KeyCode::Char('n') => Some(DeskAction::NewTicket),
        KeyCode::Char('R') => Some(DeskAction::StartReply),
        KeyCode::Char('c') => Some(DeskAction::CloseTicket),
        KeyCode::Char('y') => Some(DeskAction::CopyId),
        KeyCode::Esc => Some(DeskAction::Back),
        KeyCode::Char('q') => Some(DeskAction::Quit),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
