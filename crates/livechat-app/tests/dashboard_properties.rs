//! Property-based tests for the agent dashboard.
//!
//! Arbitrary interleavings of channel pushes and agent intents must keep the
//! conversation list consistent.

use std::collections::HashSet;

use livechat_app::{App, AppAction, AppEvent, ClientConfig, UserInput};
use livechat_client::{Environment, SenderRole};
use livechat_proto::{
    InboundEvent, OutboundEvent,
    events::{NewCustomerSession, ReceiveMessage},
};
use proptest::prelude::*;

#[derive(Clone)]
struct FixedClock;

impl Environment for FixedClock {
    fn time_label(&self) -> String {
        "12:00 PM".into()
    }
}

fn role_strategy() -> impl Strategy<Value = SenderRole> {
    prop_oneof![3 => Just(SenderRole::Visitor), 1 => Just(SenderRole::Agent)]
}

/// Generate random dashboard events over a small id space so collisions
/// happen often.
fn event_strategy() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        1 => Just(AppEvent::Channel(InboundEvent::Connect)),
        1 => Just(AppEvent::Channel(InboundEvent::Disconnect)),
        3 => (1u64..6, 1u64..6).prop_map(|(id, customer_id)| {
            AppEvent::Channel(InboundEvent::NewCustomerSession(NewCustomerSession {
                id,
                customer_id,
                customer_name: format!("c{customer_id}"),
                status: "open".into(),
            }))
        }),
        4 => ("[a-z]{1,8}", role_strategy(), 1u64..6, 1u64..6).prop_map(
            |(message, sender_type, session, customer)| {
                AppEvent::Channel(InboundEvent::ReceiveMessage(ReceiveMessage {
                    message,
                    sender_type,
                    timestamp: None,
                    session_id: Some(session),
                    customer_id: Some(customer),
                    customer_name: None,
                }))
            }
        ),
        2 => (1u64..6).prop_map(|id| AppEvent::Input(UserInput::Select(id))),
        1 => (1u64..6).prop_map(|id| AppEvent::Input(UserInput::NewChat(id))),
        2 => "[a-z ]{0,10}".prop_map(|text| AppEvent::Input(UserInput::Submit(text))),
        1 => Just(AppEvent::Input(UserInput::Toggle)),
    ]
}

proptest! {
    #[test]
    fn prop_conversation_list_stays_consistent(
        events in prop::collection::vec(event_strategy(), 0..80)
    ) {
        let mut app = App::new(ClientConfig::agent(), FixedClock);
        let _ = app.start();

        for event in events {
            let actions = app.handle(event);
            let dashboard = app.dashboard().unwrap();

            let mut seen = HashSet::new();
            for conversation in dashboard.conversations() {
                prop_assert!(seen.insert(conversation.session_id), "duplicate conversation");
            }

            if let Some(active) = dashboard.active() {
                let listed = dashboard.conversation(active);
                prop_assert!(listed.is_some(), "active conversation not listed");
                prop_assert!(!listed.unwrap().unread || !app.widget().is_open());
            }

            // No agent send addresses a missing customer.
            for action in &actions {
                if let AppAction::Emit(OutboundEvent::SendMessage(send)) = action {
                    prop_assert!(send.customer_id.is_some());
                }
            }
        }
    }

    #[test]
    fn prop_agent_echoes_never_change_state(
        session in 1u64..6,
        text in "[a-z]{1,8}",
    ) {
        let mut app = App::new(ClientConfig::agent(), FixedClock);
        let _ = app.handle(AppEvent::Channel(InboundEvent::Connect));
        let before = app.dashboard().unwrap().conversations().to_vec();

        let actions = app.handle(AppEvent::Channel(InboundEvent::ReceiveMessage(ReceiveMessage {
            message: text,
            sender_type: SenderRole::Agent,
            timestamp: None,
            session_id: Some(session),
            customer_id: None,
            customer_name: None,
        })));

        prop_assert!(actions.is_empty());
        prop_assert_eq!(app.dashboard().unwrap().conversations(), before.as_slice());
    }
}
