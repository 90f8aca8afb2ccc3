//! Behavioral tests for the chat widget.
//!
//! # Oracle Pattern
//!
//! Each test drives the widget through its public API only and ends with
//! checks on:
//! - the visible message list (texts, roles, order)
//! - the actions emitted (what would have gone over the channel)

use livechat_client::{
    ChatWidget, ConnectionState, Environment, Origin, SendRejected, SenderRole, SessionBinding,
    WidgetAction, WidgetEvent, notice,
};
use livechat_proto::{
    OutboundEvent,
    events::{HistoryEntry, ReceiveMessage, RequestHistory, SendMessage},
};

#[derive(Clone)]
struct FixedClock;

impl Environment for FixedClock {
    fn time_label(&self) -> String {
        "09:41 AM".into()
    }
}

fn connected(mut widget: ChatWidget<FixedClock>) -> ChatWidget<FixedClock> {
    let _ = widget.on_connection_change(ConnectionState::Connected);
    widget
}

fn entry(text: &str, role: SenderRole) -> HistoryEntry {
    HistoryEntry { message_text: text.into(), sender_type: role, timestamp: Some("09:00 AM".into()) }
}

fn push(text: &str, role: SenderRole) -> ReceiveMessage {
    ReceiveMessage {
        message: text.into(),
        sender_type: role,
        timestamp: Some("09:05 AM".into()),
        session_id: None,
        customer_id: None,
        customer_name: None,
    }
}

fn emitted(actions: &[WidgetAction]) -> Vec<&OutboundEvent> {
    actions
        .iter()
        .filter_map(|a| match a {
            WidgetAction::Emit(event) => Some(event),
            WidgetAction::Render => None,
        })
        .collect()
}

fn texts(widget: &ChatWidget<FixedClock>) -> Vec<&str> {
    widget.messages().iter().map(|m| m.text.as_str()).collect()
}

#[test]
fn whitespace_only_send_emits_nothing() {
    let mut widget = connected(ChatWidget::visitor(FixedClock));

    for draft in ["", "   ", "\n\t "] {
        assert_eq!(widget.send(draft), Err(SendRejected::Empty));
    }
    assert!(widget.messages().is_empty());
}

#[test]
fn length_limit_is_inclusive() {
    let mut widget = connected(ChatWidget::visitor(FixedClock));

    let too_long = "a".repeat(501);
    assert_eq!(widget.send(&too_long), Err(SendRejected::TooLong { len: 501, max: 500 }));
    assert!(widget.messages().is_empty());

    let at_limit = "a".repeat(500);
    let actions = widget.send(&at_limit).unwrap();
    assert_eq!(emitted(&actions).len(), 1);
    assert_eq!(widget.messages().len(), 1);
}

#[test]
fn length_counts_characters_not_bytes() {
    let mut widget = connected(ChatWidget::visitor(FixedClock));

    let accented = "é".repeat(500);
    assert!(widget.send(&accented).is_ok());
}

#[test]
fn send_trims_before_emitting() {
    let mut widget = connected(ChatWidget::visitor(FixedClock));

    let actions = widget.send("  hi there \n").unwrap();

    assert_eq!(emitted(&actions), vec![&OutboundEvent::SendMessage(SendMessage {
        message: "hi there".into(),
        session_id: None,
        customer_id: None,
    })]);
    assert_eq!(texts(&widget), ["hi there"]);
}

#[test]
fn history_replaces_prior_content() {
    let mut widget = connected(ChatWidget::visitor(FixedClock));
    let _ = widget.on_message_received(push("early push", SenderRole::Agent));
    let _ = widget.open();

    let _ = widget.on_history_received(vec![
        entry("m1", SenderRole::Visitor),
        entry("m2", SenderRole::Agent),
    ]);

    assert_eq!(texts(&widget), ["m1", "m2"]);
    assert!(widget.messages().iter().all(|m| m.origin == Origin::Remote));
}

#[test]
fn second_history_push_in_same_cycle_is_noop() {
    let mut widget = connected(ChatWidget::visitor(FixedClock));
    let _ = widget.open();
    let _ = widget.on_history_received(vec![entry("m1", SenderRole::Visitor)]);
    let _ = widget.send("in progress").unwrap();

    let actions = widget.on_history_received(vec![entry("stale", SenderRole::Agent)]);

    assert!(actions.is_empty());
    assert_eq!(texts(&widget), ["m1", "in progress"]);
}

#[test]
fn self_echo_is_not_appended() {
    let mut visitor = connected(ChatWidget::visitor(FixedClock));
    let _ = visitor.send("hello").unwrap();
    let _ = visitor.on_message_received(push("hello", SenderRole::Visitor));
    assert_eq!(texts(&visitor), ["hello"]);

    let mut agent = connected(ChatWidget::agent(FixedClock));
    let _ = agent.bind(SessionBinding::Active(1), Some(42));
    let _ = agent.send("hi").unwrap();
    let _ = agent.on_message_received(push("hi", SenderRole::Agent));
    assert_eq!(texts(&agent), ["hi"]);
}

#[test]
fn disconnect_while_open_adds_one_notice_and_blocks_sends() {
    let mut widget = connected(ChatWidget::visitor(FixedClock));
    let _ = widget.open();
    let _ = widget.on_history_received(vec![]);
    let before = widget.messages().len();

    let _ = widget.on_connection_change(ConnectionState::Disconnected);
    let _ = widget.on_connection_change(ConnectionState::Disconnected);

    assert_eq!(widget.messages().len(), before + 1);
    assert_eq!(texts(&widget).last(), Some(&notice::CONNECTION_LOST));
    assert!(!widget.send_enabled());

    let snapshot = widget.messages().to_vec();
    assert_eq!(widget.send("anyone?"), Err(SendRejected::Disconnected));
    assert_eq!(widget.messages(), snapshot.as_slice());
}

#[test]
fn reconnect_does_not_replay() {
    let mut widget = connected(ChatWidget::visitor(FixedClock));
    let _ = widget.open();
    let _ = widget.on_history_received(vec![]);
    let _ = widget.on_connection_change(ConnectionState::Disconnected);
    let _ = widget.send("lost");

    let actions = widget.on_connection_change(ConnectionState::Connected);

    assert!(emitted(&actions).is_empty());
    assert!(!texts(&widget).contains(&"lost"));
}

#[test]
fn visitor_open_with_empty_history_shows_welcome_only() {
    let mut widget = connected(ChatWidget::visitor(FixedClock));

    let actions = widget.open();
    assert_eq!(emitted(&actions), vec![&OutboundEvent::RequestHistory(RequestHistory {
        session_id: None
    })]);

    let _ = widget.on_history_received(vec![]);

    assert_eq!(texts(&widget), [notice::VISITOR_WELCOME]);
    assert!(widget.messages().iter().all(|m| m.role == SenderRole::System));
}

#[test]
fn agent_send_renders_before_acknowledgment() {
    let mut widget = connected(ChatWidget::agent(FixedClock));
    let _ = widget.bind(SessionBinding::Active(7), Some(42));
    let _ = widget.open();

    let actions = widget.send("hello").unwrap();

    assert_eq!(emitted(&actions), vec![&OutboundEvent::SendMessage(SendMessage {
        message: "hello".into(),
        session_id: Some(7),
        customer_id: Some(42),
    })]);
    let last = widget.messages().last().unwrap();
    assert_eq!(last.text, "hello");
    assert_eq!(last.role, SenderRole::Agent);
    assert_eq!(last.origin, Origin::Local);
}

#[test]
fn agent_empty_history_shows_agent_notice() {
    let mut widget = connected(ChatWidget::agent(FixedClock));
    let _ = widget.bind(SessionBinding::Active(7), Some(42));

    let actions = widget.open();
    assert_eq!(emitted(&actions), vec![&OutboundEvent::RequestHistory(RequestHistory {
        session_id: Some(7)
    })]);

    let _ = widget.on_history_received(vec![]);
    assert_eq!(texts(&widget), [notice::AGENT_EMPTY_HISTORY]);
}

#[test]
fn history_failure_degrades_to_notice() {
    let mut widget = connected(ChatWidget::visitor(FixedClock));
    let _ = widget.open();

    let actions = widget.handle(WidgetEvent::HistoryFailed { reason: "bad payload".into() });

    assert_eq!(actions, Ok(vec![WidgetAction::Render]));
    assert_eq!(texts(&widget), [notice::HISTORY_FAILED]);
    assert!(!widget.history_loaded());
}

#[test]
fn handle_dispatches_toggle() {
    let mut widget = connected(ChatWidget::visitor(FixedClock));

    let _ = widget.handle(WidgetEvent::Toggle);
    assert!(widget.is_open());

    let _ = widget.handle(WidgetEvent::Toggle);
    assert!(!widget.is_open());
}
