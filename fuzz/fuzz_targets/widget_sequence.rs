//! Fuzz target for chat widget event sequences
//!
//! Drives a widget with arbitrary user and channel events.
//!
//! # Invariants
//!
//! - Unread messages only accumulate while the panel is closed
//! - A rejected send changes nothing
//! - Every emitted message is non-blank and within the length limit
//! - NEVER panic

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use livechat_client::{
    ChatWidget, ConnectionState, Environment, MAX_MESSAGE_CHARS, SenderRole, WidgetAction,
    WidgetEvent,
};
use livechat_proto::{
    OutboundEvent,
    events::{HistoryEntry, ReceiveMessage},
};

#[derive(Clone)]
struct FixedClock;

impl Environment for FixedClock {
    fn time_label(&self) -> String {
        "12:00 PM".into()
    }
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Role {
    Visitor,
    Agent,
    System,
}

impl From<Role> for SenderRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Visitor => Self::Visitor,
            Role::Agent => Self::Agent,
            Role::System => Self::System,
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Open,
    Close,
    Toggle,
    Send(String),
    Long(u16),
    History(Vec<(String, Role)>),
    Push { text: String, role: Role, session_id: Option<u8> },
    Connected(bool),
    ChannelFailed,
}

#[derive(Debug, Arbitrary)]
struct Input {
    agent: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut widget =
        if input.agent { ChatWidget::agent(FixedClock) } else { ChatWidget::visitor(FixedClock) };

    for op in input.ops {
        let event = match op {
            Op::Open => WidgetEvent::Open,
            Op::Close => WidgetEvent::Close,
            Op::Toggle => WidgetEvent::Toggle,
            Op::Send(text) => WidgetEvent::Send { text },
            Op::Long(len) => WidgetEvent::Send { text: "x".repeat(usize::from(len % 1024)) },
            Op::History(entries) => WidgetEvent::HistoryReceived(
                entries
                    .into_iter()
                    .map(|(message_text, role)| HistoryEntry {
                        message_text,
                        sender_type: role.into(),
                        timestamp: None,
                    })
                    .collect(),
            ),
            Op::Push { text, role, session_id } => WidgetEvent::MessageReceived(ReceiveMessage {
                message: text,
                sender_type: role.into(),
                timestamp: None,
                session_id: session_id.map(u64::from),
                customer_id: None,
                customer_name: None,
            }),
            Op::Connected(up) => WidgetEvent::ConnectionChanged(if up {
                ConnectionState::Connected
            } else {
                ConnectionState::Disconnected
            }),
            Op::ChannelFailed => WidgetEvent::ChannelFailed { reason: "fuzz".into() },
        };

        let before = widget.messages().len();
        match widget.handle(event) {
            Ok(actions) => {
                for action in actions {
                    if let WidgetAction::Emit(OutboundEvent::SendMessage(send)) = action {
                        assert!(!send.message.trim().is_empty());
                        assert!(send.message.chars().count() <= MAX_MESSAGE_CHARS);
                    }
                }
            },
            Err(_) => assert_eq!(widget.messages().len(), before),
        }

        assert!(widget.unread() == 0 || !widget.is_open());
    }
});
