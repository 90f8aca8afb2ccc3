//! Integration tests for the App state machine.
//!
//! Drives visitor and agent apps with the same event sequences a driver
//! would deliver and checks the emitted actions and visible state.

use livechat_app::{App, AppAction, AppEvent, ClientConfig, DetailsPanel, UserInput};
use livechat_client::{Environment, SenderRole, notice};
use livechat_proto::{
    CustomerDetails, InboundEvent, OutboundEvent,
    events::{ChatHistory, HistoryEntry, NewCustomerSession, ReceiveMessage, SendMessage},
};

#[derive(Clone)]
struct FixedClock;

impl Environment for FixedClock {
    fn time_label(&self) -> String {
        "11:11 AM".into()
    }
}

fn input(input: UserInput) -> AppEvent {
    AppEvent::Input(input)
}

fn channel(event: InboundEvent) -> AppEvent {
    AppEvent::Channel(event)
}

fn emitted(actions: &[AppAction]) -> Vec<&OutboundEvent> {
    actions
        .iter()
        .filter_map(|a| match a {
            AppAction::Emit(event) => Some(event),
            _ => None,
        })
        .collect()
}

fn texts<E: Environment>(app: &App<E>) -> Vec<String> {
    app.widget().messages().iter().map(|m| m.text.clone()).collect()
}

#[test]
fn visitor_conversation_round_trip() {
    let mut app = App::new(ClientConfig::default(), FixedClock);
    let _ = app.start();
    let _ = app.handle(channel(InboundEvent::Connect));
    let _ = app.handle(input(UserInput::Open));

    let _ = app.handle(channel(InboundEvent::ChatHistory(ChatHistory {
        history: vec![HistoryEntry {
            message_text: "my card is blocked".into(),
            sender_type: SenderRole::Visitor,
            timestamp: Some("10:00 AM".into()),
        }],
    })));

    let actions = app.handle(input(UserInput::Submit("any news?".into())));
    assert_eq!(emitted(&actions), vec![&OutboundEvent::SendMessage(SendMessage {
        message: "any news?".into(),
        session_id: None,
        customer_id: None,
    })]);

    let _ = app.handle(channel(InboundEvent::ReceiveMessage(ReceiveMessage {
        message: "Unblocked it for you.".into(),
        sender_type: SenderRole::Agent,
        timestamp: None,
        session_id: Some(3),
        customer_id: None,
        customer_name: None,
    })));

    assert_eq!(texts(&app), ["my card is blocked", "any news?", "Unblocked it for you."]);
    assert_eq!(app.status_message(), None);
}

#[test]
fn visitor_ignores_agent_broadcasts() {
    let mut app = App::new(ClientConfig::default(), FixedClock);
    let _ = app.handle(channel(InboundEvent::Connect));

    let actions = app.handle(channel(InboundEvent::NewCustomerSession(NewCustomerSession {
        id: 1,
        customer_id: 2,
        customer_name: "someone".into(),
        status: "open".into(),
    })));

    assert!(actions.is_empty());
}

#[test]
fn agent_joins_admin_channel_and_handles_new_session() {
    let mut app = App::new(ClientConfig::agent(), FixedClock);
    let _ = app.start();

    let actions = app.handle(channel(InboundEvent::Connect));
    assert_eq!(emitted(&actions), vec![&OutboundEvent::JoinAgentChannel]);

    let _ = app.handle(channel(InboundEvent::NewCustomerSession(NewCustomerSession {
        id: 7,
        customer_id: 42,
        customer_name: "Ada".into(),
        status: "open".into(),
    })));
    let actions = app.handle(input(UserInput::Select(7)));
    assert!(actions.contains(&AppAction::FetchCustomerDetails { customer_id: 42 }));

    let details = CustomerDetails { username: Some("ada".into()), ..Default::default() };
    let _ = app.handle(AppEvent::CustomerDetailsLoaded { customer_id: 42, details: details.clone() });

    let dashboard = app.dashboard().unwrap();
    assert_eq!(dashboard.details(), &DetailsPanel::Loaded { customer_id: 42, details });
    assert_eq!(dashboard.conversations()[0].customer_name, "Ada");
}

#[test]
fn agent_reply_reaches_backend_with_session_and_customer() {
    let config = ClientConfig {
        preselected_session: Some(7),
        preselected_customer: Some(42),
        ..ClientConfig::agent()
    };
    let mut app = App::new(config, FixedClock);
    let _ = app.start();
    let actions = app.handle(channel(InboundEvent::Connect));
    assert!(emitted(&actions).iter().any(|e| matches!(e, OutboundEvent::RequestHistory(_))));
    let _ = app.handle(channel(InboundEvent::ChatHistory(ChatHistory::default())));

    let actions = app.handle(input(UserInput::Submit("hello".into())));

    assert_eq!(emitted(&actions), vec![&OutboundEvent::SendMessage(SendMessage {
        message: "hello".into(),
        session_id: Some(7),
        customer_id: Some(42),
    })]);
    assert_eq!(texts(&app), [notice::AGENT_EMPTY_HISTORY, "hello"]);
    assert_eq!(app.dashboard().unwrap().conversations()[0].preview.as_deref(), Some("hello"));
}

#[test]
fn details_panel_can_be_hidden_and_reshown() {
    let config = ClientConfig { preselected_customer: Some(5), ..ClientConfig::agent() };
    let mut app = App::new(config, FixedClock);
    let _ = app.start();
    let _ = app.handle(AppEvent::CustomerDetailsFailed { customer_id: 5, reason: "404".into() });

    let _ = app.handle(input(UserInput::HideDetails));
    assert_eq!(app.dashboard().unwrap().details(), &DetailsPanel::Hidden);

    let actions = app.handle(input(UserInput::ShowDetails));
    assert!(actions.contains(&AppAction::FetchCustomerDetails { customer_id: 5 }));
}

#[test]
fn undecodable_history_shows_failure_notice() {
    let mut app = App::new(ClientConfig::default(), FixedClock);
    let _ = app.handle(channel(InboundEvent::Connect));
    let _ = app.handle(input(UserInput::Open));

    let frame = livechat_proto::Envelope::decode_inbound(r#"{"event":"chat_history"}"#);
    let event = AppEvent::from_channel(frame).unwrap();
    let _ = app.handle(event);

    assert_eq!(texts(&app), [notice::HISTORY_FAILED]);
}
