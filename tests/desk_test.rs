//! Ticket screens driven against an in-memory backend
//!
//! These complement the unit tests next to the model code by running the
//! whole request/response loop through the `Backend` trait.

mod common;

use common::{FakeBackend, message, ticket};
use gatedesk::api::Backend;
use gatedesk::session::Session;
use gatedesk::tickets::detail::execute;
use gatedesk::tickets::{
    DetailEffect, DetailMode, DetailRequest, DetailScreen, LoadOutcome, TicketList,
};
use gatedesk::tui::desk::model::{DeskAction, DeskEffect, DeskState, Screen, reduce_desk_state};
use gatedesk::types::Urgency;

fn session() -> Session {
    Session::new("sk_test_fake")
}

fn ids(list: &TicketList) -> Vec<&str> {
    list.visible().iter().map(|t| t.ticket_id.as_str()).collect()
}

fn thread_texts(screen: &DetailScreen) -> Vec<String> {
    match screen.mode() {
        DetailMode::Viewing(thread) => thread.messages().iter().map(|m| m.message.clone()).collect(),
        DetailMode::Creating(_) => panic!("expected viewing mode"),
    }
}

#[tokio::test]
async fn test_reload_sorts_backend_order() {
    let backend = FakeBackend::with_tickets(vec![
        ticket("1", true, Urgency::Normal, "2024-01-01"),
        ticket("2", false, Urgency::Critical, "2024-06-01"),
        ticket("3", true, Urgency::Critical, "2024-03-01"),
    ]);
    let mut list = TicketList::new(10);

    assert_eq!(list.reload(&backend, &session()).await, LoadOutcome::Applied);
    assert_eq!(ids(&list), vec!["3", "1", "2"]);
    assert_eq!(backend.calls(), vec!["list_tickets"]);
}

#[tokio::test]
async fn test_rejected_reload_keeps_previous_list() {
    let backend = FakeBackend::with_tickets(vec![ticket("1", true, Urgency::High, "2024-01-01")]);
    let mut list = TicketList::new(10);
    list.reload(&backend, &session()).await;

    *backend.reject_with.lock() = Some("Session expired".to_string());
    assert_eq!(list.reload(&backend, &session()).await, LoadOutcome::Failed);
    assert!(!list.is_loading());
    assert_eq!(ids(&list), vec!["1"]);
}

#[tokio::test]
async fn test_open_ticket_shows_thread_oldest_first() {
    let backend = FakeBackend::default();
    *backend.messages.lock() = vec![
        message("support", "m3", "2024-01-03"),
        message("me", "m2", "2024-01-02"),
        message("me", "m1", "2024-01-01"),
    ];

    let (mut screen, request) = DetailScreen::viewing("t-1");
    let effect = screen.drive(&backend, &session(), request).await;
    assert_eq!(effect, DetailEffect::None);
    assert_eq!(thread_texts(&screen), vec!["m1", "m2", "m3"]);
    assert_eq!(backend.calls(), vec!["list_ticket_messages t-1"]);
}

#[tokio::test]
async fn test_empty_reply_never_reaches_backend() {
    let backend = FakeBackend::default();
    let (mut screen, request) = DetailScreen::viewing("t-1");
    screen.drive(&backend, &session(), request).await;

    *screen.reply_mut().unwrap() = " \n ".to_string();
    assert!(screen.submit_reply().is_none());
    assert_eq!(screen.error(), Some("Message cannot be empty"));
    assert_eq!(backend.calls(), vec!["list_ticket_messages t-1"]);
}

#[tokio::test]
async fn test_reply_posts_then_refetches() {
    let backend = FakeBackend::default();
    *backend.messages.lock() = vec![message("support", "How can we help?", "2024-01-01")];

    let (mut screen, request) = DetailScreen::viewing("t-1");
    screen.drive(&backend, &session(), request).await;

    *screen.reply_mut().unwrap() = "Payout is missing".to_string();
    let request = screen.submit_reply().unwrap();
    let effect = screen.drive(&backend, &session(), request).await;

    assert_eq!(effect, DetailEffect::None);
    assert_eq!(
        thread_texts(&screen),
        vec!["How can we help?", "Payout is missing"]
    );
    assert_eq!(
        backend.calls(),
        vec![
            "list_ticket_messages t-1",
            "create_ticket_message t-1",
            "list_ticket_messages t-1",
        ]
    );
}

#[tokio::test]
async fn test_rejected_close_shows_backend_message() {
    let backend = FakeBackend::default();
    let (mut screen, request) = DetailScreen::viewing("t-1");
    screen.drive(&backend, &session(), request).await;

    *backend.reject_with.lock() = Some("Ticket is already closed".to_string());
    let request = screen.submit_close().unwrap();
    let effect = screen.drive(&backend, &session(), request).await;

    assert_eq!(effect, DetailEffect::None);
    assert_eq!(screen.error(), Some("Ticket is already closed"));
    assert!(!screen.is_sending());
}

#[tokio::test]
async fn test_desk_create_ticket_round_trip() {
    let backend = FakeBackend::with_tickets(vec![ticket("t-1", true, Urgency::Normal, "2024-01-01")]);
    let session = session();
    let mut state = DeskState::new(10);

    let DeskEffect::LoadTickets(generation) = state.begin_reload() else {
        panic!("expected a load");
    };
    state.finish_list_load(generation, backend.list_tickets(&session).await);
    assert_eq!(state.list.tickets().len(), 1);

    let (next, _) = reduce_desk_state(state, DeskAction::NewTicket, 10);
    state = next;
    for c in "Payout late".chars() {
        state = reduce_desk_state(state, DeskAction::Input(c), 10).0;
    }
    state = reduce_desk_state(state, DeskAction::NextField, 10).0;
    for c in "Since Monday".chars() {
        state = reduce_desk_state(state, DeskAction::Input(c), 10).0;
    }
    state = reduce_desk_state(state, DeskAction::CycleSeverity, 10).0;
    state = reduce_desk_state(state, DeskAction::CycleSeverity, 10).0;

    let (mut state, effect) = reduce_desk_state(state, DeskAction::Submit, 10);
    let Some(DeskEffect::Detail(request)) = effect else {
        panic!("expected a create request");
    };
    assert!(matches!(&request, DetailRequest::Create(t) if t.urgency == Urgency::Critical));

    let response = execute(&backend, &session, &request).await;
    let follow = state.finish_detail(&request, response);
    assert_eq!(state.screen, Screen::List);

    let Some(DeskEffect::LoadTickets(generation)) = follow else {
        panic!("expected the list to reload");
    };
    state.finish_list_load(generation, backend.list_tickets(&session).await);
    let first = &state.list.visible()[0];
    assert_eq!(first.title, "Payout late");
    assert_eq!(first.urgency, Urgency::Critical);
}
