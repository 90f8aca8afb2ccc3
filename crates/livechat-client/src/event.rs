//! Widget events and actions.

use livechat_proto::{
    OutboundEvent,
    events::{HistoryEntry, ReceiveMessage},
};

use crate::ConnectionState;

/// Events the caller feeds into the widget.
///
/// User intents (`Open`, `Close`, `Toggle`, `Send`) come from the frontend;
/// the rest are translated from the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Show the panel.
    Open,
    /// Hide the panel.
    Close,
    /// Flip panel visibility.
    Toggle,
    /// Send the given draft text.
    Send {
        /// Draft text as typed; trimmed by the widget.
        text: String,
    },
    /// History push from the channel.
    HistoryReceived(Vec<HistoryEntry>),
    /// Live message push from the channel.
    MessageReceived(ReceiveMessage),
    /// Channel connection state changed.
    ConnectionChanged(ConnectionState),
    /// Channel could not be established.
    ChannelFailed {
        /// Failure description.
        reason: String,
    },
    /// History push could not be read.
    HistoryFailed {
        /// Failure description.
        reason: String,
    },
}

/// Actions the widget produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    /// Emit an event on the channel.
    Emit(OutboundEvent),
    /// View state changed; re-render.
    Render,
}
