//! Support desk component
//!
//! Thin iocraft shell around the pure model: key events become
//! [`DeskAction`]s, the reducer decides, and effects are run through async
//! handlers whose results are folded back into the state.

use std::time::Instant;

use iocraft::prelude::*;

use crate::api::{Backend, HttpBackend};
use crate::commands::copy_to_clipboard;
use crate::display::today;
use crate::error::DeskError;
use crate::session::Session;
use crate::tickets::detail::execute;
use crate::tickets::{DetailRequest, Generation};
use crate::tui::components::{Footer, TOAST_DURATION, render_toast};
use crate::tui::theme::theme;
use crate::types::Urgency;

use super::model::{
    DeskEffect, DeskState, DetailViewModel, Field, HeaderViewModel, Layout, ListViewModel,
    TicketRowViewModel, compute_desk_view_model, key_to_action, reduce_desk_state,
};

/// Props for the SupportDesk component
#[derive(Default, Props)]
pub struct SupportDeskProps {
    pub backend: Option<HttpBackend>,
    pub session: Option<Session>,
    pub page_size: usize,
}

/// Full-screen ticket list and detail view
#[component]
pub fn SupportDesk(props: &SupportDeskProps, mut hooks: Hooks) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();

    let page_size = props.page_size;
    let state: State<DeskState> = hooks.use_state(move || DeskState::new(page_size));
    let mut started = hooks.use_state(|| false);
    let mut toast_scheduled: State<Option<Instant>> = hooks.use_state(|| None);

    // Header (3) + column titles (1) + status line (1) + footer (1) + borders (2)
    let list_height = height.saturating_sub(8) as usize;

    let load_handler: Handler<Generation> = hooks.use_async_handler({
        let backend = props.backend.clone();
        let session = props.session.clone();

        move |generation: Generation| {
            let backend = backend.clone();
            let session = session.clone();
            let mut state = state;

            async move {
                let result = match (&backend, &session) {
                    (Some(backend), Some(session)) => backend.list_tickets(session).await,
                    _ => Err(DeskError::NotLoggedIn),
                };
                state.write().finish_list_load(generation, result);
            }
        }
    });

    let detail_handler: Handler<DetailRequest> = hooks.use_async_handler({
        let backend = props.backend.clone();
        let session = props.session.clone();
        let load_handler = load_handler.clone();

        move |request: DetailRequest| {
            let backend = backend.clone();
            let session = session.clone();
            let load_handler = load_handler.clone();
            let mut state = state;

            async move {
                let (Some(backend), Some(session)) = (backend, session) else {
                    tracing::warn!("no session, dropping {request:?}");
                    return;
                };
                let mut request = request;
                loop {
                    let response = execute(&backend, &session, &request).await;
                    let follow = state.write().finish_detail(&request, response);
                    match follow {
                        Some(DeskEffect::Detail(next)) => request = next,
                        Some(DeskEffect::LoadTickets(generation)) => {
                            load_handler(generation);
                            break;
                        }
                        Some(DeskEffect::CopyToClipboard(_)) | None => break,
                    }
                }
            }
        }
    });

    let toast_timer: Handler<Instant> = hooks.use_async_handler(move |_shown: Instant| {
        let mut state = state;
        async move {
            tokio::time::sleep(TOAST_DURATION).await;
            state.write().expire_toast(Instant::now());
        }
    });

    // Initial load on mount
    if !started.get() {
        started.set(true);
        let generation = {
            let mut state = state;
            state.write().list.begin_load()
        };
        load_handler(generation);
    }

    let shown_toast = state.read().toast.as_ref().map(|t| t.timestamp);
    if let Some(timestamp) = shown_toast
        && toast_scheduled.get() != Some(timestamp)
    {
        toast_scheduled.set(Some(timestamp));
        toast_timer(timestamp);
    }

    hooks.use_terminal_events({
        let load_handler = load_handler.clone();
        let detail_handler = detail_handler.clone();

        move |event| {
            let TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event
            else {
                return;
            };
            if kind == KeyEventKind::Release {
                return;
            }

            let mut state = state;
            let current = DeskState::clone(&state.read());
            let Some(action) = key_to_action(code, modifiers, &current) else {
                return;
            };
            let (next, effect) = reduce_desk_state(current, action, list_height);
            state.set(next);

            match effect {
                Some(DeskEffect::LoadTickets(generation)) => load_handler(generation),
                Some(DeskEffect::Detail(request)) => detail_handler(request),
                Some(DeskEffect::CopyToClipboard(ticket_id)) => {
                    let result = copy_to_clipboard(&ticket_id);
                    state.write().copied(&ticket_id, result);
                }
                None => {}
            }
        }
    });

    if state.read().should_exit {
        system.exit();
    }

    let vm = compute_desk_view_model(&state.read(), list_height, width, today());

    let body = match &vm.detail {
        Some(detail) => render_detail(detail),
        None => render_list(&vm.list, list_height),
    };

    element! {
        View(
            width,
            height,
            flex_direction: FlexDirection::Column,
            background_color: theme.background,
        ) {
            #(render_header(&vm.header))
            View(flex_grow: 1.0, width: 100pct, flex_direction: FlexDirection::Column) {
                #(body)
            }
            Footer(shortcuts: vm.shortcuts.clone(), compact: vm.layout == Layout::Compact)
            #(render_toast(&vm.toast))
        }
    }
}

fn render_header(header: &HeaderViewModel) -> AnyElement<'static> {
    let theme = theme();
    let counts = header
        .counts
        .iter()
        .map(|(bucket, n)| format!("{bucket} {n}"))
        .collect::<Vec<_>>()
        .join("  ");
    let status = if header.is_loading {
        "Loading...".to_string()
    } else {
        format!("{} tickets", header.total)
    };

    element! {
        View(
            width: 100pct,
            height: 3,
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::SpaceBetween,
            padding_left: 1,
            padding_right: 1,
            border_style: BorderStyle::Round,
            border_color: theme.border,
        ) {
            Text(content: "gatedesk support", color: theme.highlight, weight: Weight::Bold)
            Text(content: counts, color: theme.text_dimmed)
            Text(content: status, color: theme.text)
        }
    }
    .into_any()
}

fn render_list(list: &ListViewModel, list_height: usize) -> AnyElement<'static> {
    let theme = theme();
    let wide = list.rows.iter().any(|row| row.updated.is_some());

    if list.total == 0 {
        return element! {
            View(
                width: 100pct,
                height: 100pct,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border_style: BorderStyle::Round,
                border_color: theme.border,
            ) {
                Text(content: "No tickets", color: theme.text_dimmed)
            }
        }
        .into_any();
    }

    let below = list
        .visible_count
        .saturating_sub(list.scroll_offset + list_height);
    let mut status = format!("Showing {} of {} tickets", list.visible_count, list.total);
    if list.has_more {
        status.push_str(" (m to load more)");
    }
    if below > 0 {
        status.push_str(&format!("  {below} more below"));
    }

    element! {
        View(
            width: 100pct,
            height: 100pct,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: theme.border_focused,
        ) {
            View(height: 1, flex_direction: FlexDirection::Row, padding_left: 1) {
                View(width: 2) {}
                View(width: 12) { Text(content: "ID", color: theme.text_dimmed) }
                View(width: 11) { Text(content: "Severity", color: theme.text_dimmed) }
                View(width: 8) { Text(content: "Status", color: theme.text_dimmed) }
                View(flex_grow: 1.0) { Text(content: "Title", color: theme.text_dimmed) }
                #(wide.then(|| element! {
                    View(width: 18) { Text(content: "Updated", color: theme.text_dimmed) }
                }))
                View(width: 12) { Text(content: "Age", color: theme.text_dimmed) }
                #(wide.then(|| element! {
                    View(width: 17) { Text(content: "Reply", color: theme.text_dimmed) }
                }))
            }
            #(list.rows.iter().map(render_row))
            View(flex_grow: 1.0) {}
            View(height: 1, padding_left: 1) {
                Text(content: status, color: theme.text_dimmed)
            }
        }
    }
    .into_any()
}

fn render_row(row: &TicketRowViewModel) -> AnyElement<'static> {
    let theme = theme();
    let (bg, fg) = if row.is_selected {
        (Some(theme.highlight), theme.highlight_text)
    } else {
        (None, theme.text)
    };
    let indicator = if row.is_selected { ">" } else { " " };

    element! {
        View(
            height: 1,
            width: 100pct,
            flex_direction: FlexDirection::Row,
            padding_left: 1,
            background_color: bg,
        ) {
            View(width: 2) { Text(content: indicator, color: fg) }
            View(width: 12) {
                Text(content: row.ticket_id.clone(), color: theme.id_color)
            }
            View(width: 11) {
                Text(
                    content: format!("[{}]", row.severity),
                    color: theme.severity_color(row.severity),
                )
            }
            View(width: 8) {
                Text(content: row.status.to_string(), color: theme.status_color(row.status))
            }
            View(flex_grow: 1.0) {
                Text(content: row.title.clone(), color: fg)
            }
            #(row.updated.clone().map(|updated| element! {
                View(width: 18) { Text(content: updated, color: theme.text_dimmed) }
            }))
            View(width: 12) { Text(content: row.age.clone(), color: theme.text_dimmed) }
            #(row.reply.clone().map(|reply| element! {
                View(width: 17) { Text(content: reply, color: fg) }
            }))
        }
    }
    .into_any()
}

fn render_detail(detail: &DetailViewModel) -> AnyElement<'static> {
    match detail {
        DetailViewModel::Creating {
            title,
            message,
            severity,
            field,
            error,
            sending,
        } => render_new_ticket(title, message, *severity, *field, error.clone(), *sending),
        DetailViewModel::Viewing { .. } => render_thread(detail),
    }
}

fn render_new_ticket(
    title: &str,
    message: &str,
    severity: Urgency,
    field: Field,
    error: Option<String>,
    sending: bool,
) -> AnyElement<'static> {
    let theme = theme();
    let field_border = |f: Field| {
        if f == field {
            theme.border_focused
        } else {
            theme.border
        }
    };
    let status = if sending { "Sending..." } else { "" };

    element! {
        View(
            width: 100pct,
            height: 100pct,
            flex_direction: FlexDirection::Column,
            padding_left: 1,
            padding_right: 1,
            border_style: BorderStyle::Round,
            border_color: theme.border_focused,
        ) {
            Text(content: "New ticket", color: theme.highlight, weight: Weight::Bold)
            View(flex_direction: FlexDirection::Row, height: 1) {
                Text(content: "Severity: ", color: theme.text_dimmed)
                Text(
                    content: format!("[{}]", severity),
                    color: theme.severity_color(severity),
                )
            }
            View(
                height: 3,
                border_style: BorderStyle::Round,
                border_color: field_border(Field::Title),
                padding_left: 1,
            ) {
                Text(content: format!("Title: {title}"), color: theme.text)
            }
            View(
                flex_grow: 1.0,
                border_style: BorderStyle::Round,
                border_color: field_border(Field::Message),
                padding_left: 1,
            ) {
                Text(content: message.to_string(), color: theme.text)
            }
            #(error.map(|e| element! {
                Text(content: e, color: theme.error)
            }))
            Text(content: status, color: theme.text_dimmed)
        }
    }
    .into_any()
}

fn render_thread(detail: &DetailViewModel) -> AnyElement<'static> {
    let DetailViewModel::Viewing {
        ticket_id,
        ticket,
        messages,
        loading,
        reply,
        composing,
        error,
        sending,
    } = detail
    else {
        return element!(View).into_any();
    };
    let theme = theme();

    let title = ticket
        .as_ref()
        .map_or_else(|| ticket_id.clone(), |t| format!("{}  {}", t.ticket_id, t.title));
    let mut status = String::new();
    if *loading {
        status.push_str("Loading thread...");
    } else if messages.is_empty() {
        status.push_str("No messages");
    }
    if *sending {
        status.push_str(" Sending...");
    }
    let reply_border = if *composing {
        theme.border_focused
    } else {
        theme.border
    };

    element! {
        View(
            width: 100pct,
            height: 100pct,
            flex_direction: FlexDirection::Column,
            padding_left: 1,
            padding_right: 1,
            border_style: BorderStyle::Round,
            border_color: theme.border_focused,
        ) {
            View(flex_direction: FlexDirection::Row, height: 1, column_gap: 2) {
                Text(content: title, color: theme.highlight, weight: Weight::Bold)
                #(ticket.as_ref().map(|t| element! {
                    Text(
                        content: format!("[{}]", t.urgency),
                        color: theme.severity_color(t.urgency),
                    )
                }))
                #(ticket.as_ref().map(|t| element! {
                    Text(content: t.status().to_string(), color: theme.status_color(t.status()))
                }))
            }
            View(flex_grow: 1.0, flex_direction: FlexDirection::Column, overflow: Overflow::Hidden) {
                #(messages.iter().map(|m| {
                    let sender_color = if m.from_support {
                        theme.sender_support
                    } else {
                        theme.sender_customer
                    };
                    element! {
                        View(flex_direction: FlexDirection::Column, margin_top: 1) {
                            View(flex_direction: FlexDirection::Row, column_gap: 2) {
                                Text(content: m.sender.clone(), color: sender_color, weight: Weight::Bold)
                                Text(content: m.date.clone(), color: theme.text_dimmed)
                            }
                            Text(content: m.text.clone(), color: theme.text)
                        }
                    }
                }))
            }
            View(
                height: 3,
                border_style: BorderStyle::Round,
                border_color: reply_border,
                padding_left: 1,
            ) {
                Text(
                    content: if *composing || !reply.is_empty() {
                        reply.clone()
                    } else {
                        "Press R to reply".to_string()
                    },
                    color: if *composing { theme.text } else { theme.text_dimmed },
                )
            }
            #(error.clone().map(|e| element! {
                Text(content: e, color: theme.error)
            }))
            Text(content: status, color: theme.text_dimmed)
        }
    }
    .into_any()
}
