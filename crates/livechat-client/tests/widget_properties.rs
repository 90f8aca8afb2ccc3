//! Property-based tests for the chat widget.
//!
//! Arbitrary interleavings of user intents and channel events must never
//! break the widget's invariants.

use livechat_client::{
    ChatWidget, ConnectionState, Environment, SenderRole, WidgetAction, WidgetEvent,
};
use livechat_proto::events::{HistoryEntry, ReceiveMessage};
use proptest::prelude::*;

#[derive(Clone)]
struct FixedClock;

impl Environment for FixedClock {
    fn time_label(&self) -> String {
        "12:00 PM".into()
    }
}

fn role_strategy() -> impl Strategy<Value = SenderRole> {
    prop_oneof![Just(SenderRole::Visitor), Just(SenderRole::Agent), Just(SenderRole::System)]
}

fn push_strategy() -> impl Strategy<Value = ReceiveMessage> {
    ("[a-z ]{1,20}", role_strategy()).prop_map(|(message, sender_type)| ReceiveMessage {
        message,
        sender_type,
        timestamp: None,
        session_id: None,
        customer_id: None,
        customer_name: None,
    })
}

fn history_strategy() -> impl Strategy<Value = Vec<HistoryEntry>> {
    prop::collection::vec(
        ("[a-z ]{1,20}", role_strategy()).prop_map(|(message_text, sender_type)| HistoryEntry {
            message_text,
            sender_type,
            timestamp: None,
        }),
        0..5,
    )
}

/// Generate random widget events.
fn event_strategy() -> impl Strategy<Value = WidgetEvent> {
    prop_oneof![
        2 => Just(WidgetEvent::Open),
        1 => Just(WidgetEvent::Close),
        1 => Just(WidgetEvent::Toggle),
        3 => "[ a-z]{0,12}".prop_map(|text| WidgetEvent::Send { text }),
        1 => (490usize..520).prop_map(|n| WidgetEvent::Send { text: "x".repeat(n) }),
        2 => history_strategy().prop_map(WidgetEvent::HistoryReceived),
        3 => push_strategy().prop_map(WidgetEvent::MessageReceived),
        1 => Just(WidgetEvent::ConnectionChanged(ConnectionState::Connected)),
        1 => Just(WidgetEvent::ConnectionChanged(ConnectionState::Disconnected)),
    ]
}

proptest! {
    #[test]
    fn prop_widget_invariants_hold(events in prop::collection::vec(event_strategy(), 0..60)) {
        let mut widget = ChatWidget::visitor(FixedClock);

        for event in events {
            let before = widget.messages().to_vec();
            let was_history = matches!(event, WidgetEvent::HistoryReceived(_));
            let was_loaded = widget.history_loaded();
            let self_echo = matches!(
                &event,
                WidgetEvent::MessageReceived(m) if m.sender_type != SenderRole::Agent
            );

            match widget.handle(event) {
                Ok(actions) => {
                    // Appends only extend the list; only a first history push may replace it.
                    if !(was_history && !was_loaded) {
                        prop_assert!(widget.messages().starts_with(&before));
                    }
                    if widget.connection() == ConnectionState::Disconnected {
                        let emitted_send = actions.iter().any(|a| {
                            matches!(a, WidgetAction::Emit(livechat_proto::OutboundEvent::SendMessage(_)))
                        });
                        prop_assert!(!emitted_send);
                    }
                },
                Err(_) => prop_assert_eq!(widget.messages(), before.as_slice()),
            }

            // Self echoes never make it into the list.
            if self_echo {
                prop_assert_eq!(widget.messages(), before.as_slice());
            }

            if widget.unread() > 0 {
                prop_assert!(!widget.is_open());
            }
        }
    }

    #[test]
    fn prop_disconnected_sends_never_emit(texts in prop::collection::vec("[ -~]{0,40}", 1..20)) {
        let mut widget = ChatWidget::visitor(FixedClock);
        let _ = widget.open();

        for text in texts {
            prop_assert!(widget.send(&text).is_err());
        }
        prop_assert!(widget.messages().is_empty());
    }

    #[test]
    fn prop_history_is_applied_verbatim(history in history_strategy()) {
        prop_assume!(!history.is_empty());
        let mut widget = ChatWidget::agent(FixedClock);
        let _ = widget.on_connection_change(ConnectionState::Connected);
        let _ = widget.bind(livechat_client::SessionBinding::Active(1), Some(1));
        let _ = widget.open();

        let _ = widget.on_history_received(history.clone());

        let got: Vec<_> = widget.messages().iter().map(|m| (m.text.clone(), m.role)).collect();
        let want: Vec<_> = history.into_iter().map(|e| (e.message_text, e.sender_type)).collect();
        prop_assert_eq!(got, want);
    }
}
