//! Widget state enums.

use livechat_proto::SessionId;

/// Channel connection state. Driven by the channel, never by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected; sends are rejected.
    #[default]
    Disconnected,
    /// Connected; sends are permitted.
    Connected,
}

/// Panel visibility. Driven by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    /// Panel hidden.
    #[default]
    Closed,
    /// Panel visible.
    Open {
        /// A history push has been applied during this open-cycle. Reset on
        /// every closed→open transition.
        history_loaded: bool,
    },
}

impl PanelState {
    /// True when the panel is visible.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Conversation the widget is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionBinding {
    /// No server-issued session yet (new visitor, or a customer who has never
    /// chatted). Outbound text is accepted; there is no history to request by
    /// id.
    #[default]
    Pending,
    /// Bound to a server-issued session.
    Active(SessionId),
}

impl SessionBinding {
    /// Session id, if one has been issued.
    pub fn session_id(self) -> Option<SessionId> {
        match self {
            Self::Pending => None,
            Self::Active(id) => Some(id),
        }
    }
}
