//! Client
//!
//! Action-based state machine for one live-chat conversation. The same
//! [`ChatWidget`] backs the visitor's floating widget and the agent's
//! conversation pane; only the local [`SenderRole`] differs.
//!
//! # Architecture
//!
//! The widget is Sans-IO. It receives user intents and channel events
//! ([`WidgetEvent`]), updates its view state, and returns [`WidgetAction`]s
//! (emit an event on the channel, re-render) for the caller to execute. It
//! never touches a socket or a clock directly; local timestamps come from an
//! injected [`Environment`].
//!
//! # Components
//!
//! - [`ChatWidget`]: conversation state machine
//! - [`Message`]: an entry of the visible message list
//! - [`WidgetEvent`] / [`WidgetAction`]: inputs and outputs
//! - [`SendRejected`]: why a send was refused
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::connect`]: WebSocket channel to the backend
//! - [`directory::HttpDirectory`]: customer details over HTTP

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod env;
mod error;
mod event;
mod message;
pub mod notice;
mod state;
mod widget;

#[cfg(feature = "transport")]
pub mod directory;
#[cfg(feature = "transport")]
pub mod transport;

pub use env::{Environment, SystemEnv};
pub use error::SendRejected;
pub use event::{WidgetAction, WidgetEvent};
pub use livechat_proto::{CustomerId, MAX_MESSAGE_CHARS, SenderRole, SessionId};
pub use message::{Message, Origin};
pub use state::{ConnectionState, PanelState, SessionBinding};
pub use widget::ChatWidget;
