//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the system at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use livechat_app::App;
use livechat_client::{Environment, Origin, SenderRole, SessionId};

/// Snapshot of the entire system state.
///
/// Contains observable state from one or more clients for invariant checking.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Per-client state snapshots.
    pub clients: Vec<ClientSnapshot>,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no clients).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a snapshot with a single client.
    pub fn single(client: ClientSnapshot) -> Self {
        Self { clients: vec![client] }
    }

    /// Create a snapshot from multiple clients.
    pub fn from_clients(clients: Vec<ClientSnapshot>) -> Self {
        Self { clients }
    }

    /// Add a client snapshot.
    pub fn add_client(&mut self, client: ClientSnapshot) {
        self.clients.push(client);
    }
}

/// Snapshot of a single client's observable state.
#[derive(Debug, Clone)]
pub struct ClientSnapshot {
    /// Client identifier.
    pub id: u64,
    /// Local role.
    pub role: SenderRole,
    /// Panel visible.
    pub panel_open: bool,
    /// Unread counter.
    pub unread: usize,
    /// Visible message list.
    pub messages: Vec<MessageSnapshot>,
    /// Agent: selected conversation.
    pub active_session: Option<SessionId>,
    /// Agent: listed conversations, in display order.
    pub conversations: Vec<SessionId>,
}

impl ClientSnapshot {
    /// Empty snapshot of a client with the given role.
    pub fn new(id: u64, role: SenderRole) -> Self {
        Self {
            id,
            role,
            panel_open: false,
            unread: 0,
            messages: Vec::new(),
            active_session: None,
            conversations: Vec::new(),
        }
    }

    /// Capture an app's observable state.
    pub fn from_app<E: Environment>(id: u64, app: &App<E>) -> Self {
        let widget = app.widget();
        let (active_session, conversations) = match app.dashboard() {
            Some(dashboard) => (
                dashboard.active(),
                dashboard.conversations().iter().map(|c| c.session_id).collect(),
            ),
            None => (None, Vec::new()),
        };

        Self {
            id,
            role: widget.role(),
            panel_open: widget.is_open(),
            unread: widget.unread(),
            messages: widget
                .messages()
                .iter()
                .map(|m| MessageSnapshot { text: m.text.clone(), role: m.role, origin: m.origin })
                .collect(),
            active_session,
            conversations,
        }
    }

    /// Set the visible messages.
    pub fn with_messages(mut self, messages: impl IntoIterator<Item = MessageSnapshot>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Set the agent's conversation list and selection.
    pub fn with_conversations(
        mut self,
        active: Option<SessionId>,
        conversations: impl IntoIterator<Item = SessionId>,
    ) -> Self {
        self.active_session = active;
        self.conversations.extend(conversations);
        self
    }
}

/// Snapshot of one visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSnapshot {
    /// Message text.
    pub text: String,
    /// Author role.
    pub role: SenderRole,
    /// Local or channel-delivered.
    pub origin: Origin,
}

impl MessageSnapshot {
    /// A message created on this client.
    pub fn local(text: &str, role: SenderRole) -> Self {
        Self { text: text.to_string(), role, origin: Origin::Local }
    }

    /// A message delivered by the channel.
    pub fn remote(text: &str, role: SenderRole) -> Self {
        Self { text: text.to_string(), role, origin: Origin::Remote }
    }
}
