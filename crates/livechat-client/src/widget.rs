//! Chat widget state machine.
//!
//! The `ChatWidget` owns one conversation's view state: panel visibility,
//! connection state, session binding and the visible message list. Every
//! operation is a synchronous `&mut self` handler returning the actions the
//! caller must execute.
//!
//! # Invariants
//!
//! - The message list is the last applied history push followed by every
//!   message sent or received since, in delivery order. Only a history push
//!   (or rebinding to another conversation) replaces it.
//! - At most one history push is applied per open-cycle, and only the
//!   reply to the newest outstanding request. Replies arrive in request
//!   order on one channel, so earlier replies are superseded.
//! - A message authored by the local role is only ever appended by `send`;
//!   channel echoes of it are dropped.
//! - A rejected send changes nothing and emits nothing.

use livechat_proto::{
    CustomerId, MAX_MESSAGE_CHARS, OutboundEvent, SenderRole,
    events::{HistoryEntry, ReceiveMessage, RequestHistory, SendMessage},
};

use crate::{
    ConnectionState, Environment, Message, PanelState, SendRejected, SessionBinding,
    WidgetAction, WidgetEvent, notice,
};

/// State machine for one live-chat conversation.
#[derive(Debug, Clone)]
pub struct ChatWidget<E: Environment> {
    /// Clock for local timestamps.
    env: E,
    /// Role of the local user.
    role: SenderRole,
    /// Panel visibility and per-open-cycle history flag.
    panel: PanelState,
    /// Channel state as last reported.
    connection: ConnectionState,
    /// Server session this conversation is bound to.
    session: SessionBinding,
    /// Customer addressed by agent sends. Always `None` for visitors.
    customer_id: Option<CustomerId>,
    /// Visible message list.
    messages: Vec<Message>,
    /// Messages appended while the panel was closed.
    unread: usize,
    /// History requests emitted and not yet answered on this connection.
    history_requests: usize,
}

impl<E: Environment> ChatWidget<E> {
    /// Widget for a customer chatting with the support desk.
    pub fn visitor(env: E) -> Self {
        Self::with_role(env, SenderRole::Visitor)
    }

    /// Conversation pane for a support agent. Bind it to a conversation with
    /// [`ChatWidget::bind`] before use.
    pub fn agent(env: E) -> Self {
        Self::with_role(env, SenderRole::Agent)
    }

    fn with_role(env: E, role: SenderRole) -> Self {
        Self {
            env,
            role,
            panel: PanelState::Closed,
            connection: ConnectionState::Disconnected,
            session: SessionBinding::Pending,
            customer_id: None,
            messages: Vec::new(),
            unread: 0,
            history_requests: 0,
        }
    }

    /// Process an event and return resulting actions.
    ///
    /// Only [`WidgetEvent::Send`] can fail.
    pub fn handle(&mut self, event: WidgetEvent) -> Result<Vec<WidgetAction>, SendRejected> {
        match event {
            WidgetEvent::Open => Ok(self.open()),
            WidgetEvent::Close => Ok(self.close()),
            WidgetEvent::Toggle => Ok(self.toggle()),
            WidgetEvent::Send { text } => self.send(&text),
            WidgetEvent::HistoryReceived(entries) => Ok(self.on_history_received(entries)),
            WidgetEvent::MessageReceived(push) => Ok(self.on_message_received(push)),
            WidgetEvent::ConnectionChanged(state) => Ok(self.on_connection_change(state)),
            WidgetEvent::ChannelFailed { reason } => Ok(self.on_channel_failed(&reason)),
            WidgetEvent::HistoryFailed { reason } => Ok(self.on_history_failed(&reason)),
        }
    }

    /// Show the panel.
    ///
    /// Starts a new open-cycle: clears the unread counter, resets the
    /// history flag and requests history when the channel is up. No-op when
    /// already open.
    pub fn open(&mut self) -> Vec<WidgetAction> {
        if self.panel.is_open() {
            return vec![];
        }

        self.panel = PanelState::Open { history_loaded: false };
        self.unread = 0;

        let mut actions = Vec::new();
        if let Some(request) = self.request_history() {
            tracing::debug!(role = %self.role, session = ?self.session, "requesting history");
            actions.push(WidgetAction::Emit(request));
        } else if self.role == SenderRole::Agent
            && self.session == SessionBinding::Pending
            && self.customer_id.is_some()
            && self.messages.is_empty()
        {
            self.push_notice(notice::AGENT_NEW_CHAT);
        }
        actions.push(WidgetAction::Render);
        actions
    }

    /// Hide the panel. The channel is left untouched.
    pub fn close(&mut self) -> Vec<WidgetAction> {
        if !self.panel.is_open() {
            return vec![];
        }
        self.panel = PanelState::Closed;
        vec![WidgetAction::Render]
    }

    /// Open when closed, close when open.
    pub fn toggle(&mut self) -> Vec<WidgetAction> {
        if self.panel.is_open() { self.close() } else { self.open() }
    }

    /// Validate a draft without sending it. Returns the trimmed text.
    pub fn check_send<'a>(&self, text: &'a str) -> Result<&'a str, SendRejected> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendRejected::Empty);
        }

        let len = text.chars().count();
        if len > MAX_MESSAGE_CHARS {
            return Err(SendRejected::TooLong { len, max: MAX_MESSAGE_CHARS });
        }

        if self.connection != ConnectionState::Connected {
            return Err(SendRejected::Disconnected);
        }

        if self.role == SenderRole::Agent && self.customer_id.is_none() {
            return Err(SendRejected::NoRecipient);
        }

        Ok(text)
    }

    /// Whether the send control should be enabled for `draft`.
    pub fn can_send(&self, draft: &str) -> bool {
        self.check_send(draft).is_ok()
    }

    /// Send a message.
    ///
    /// Appends it to the visible list immediately (optimistic render) and
    /// emits it on the channel without waiting for acknowledgment.
    pub fn send(&mut self, text: &str) -> Result<Vec<WidgetAction>, SendRejected> {
        let text = self.check_send(text)?;

        let payload = SendMessage {
            message: text.to_string(),
            session_id: self.session.session_id(),
            customer_id: self.customer_id,
        };
        self.messages.push(Message::local(text, self.role, self.env.time_label()));

        Ok(vec![WidgetAction::Emit(OutboundEvent::SendMessage(payload)), WidgetAction::Render])
    }

    /// Apply a history push.
    ///
    /// Replaces the whole visible list, once per open-cycle. Pushes arriving
    /// while closed or after this cycle's history was applied are ignored so
    /// an unsolicited push cannot wipe a conversation in progress. A reply to
    /// a request that a later one superseded (the pane was rebound or
    /// reopened meanwhile) is dropped; pushes carry no session id.
    pub fn on_history_received(&mut self, entries: Vec<HistoryEntry>) -> Vec<WidgetAction> {
        if self.history_requests > 0 {
            self.history_requests -= 1;
            if self.history_requests > 0 {
                tracing::debug!(
                    count = entries.len(),
                    outstanding = self.history_requests,
                    "superseded history reply dropped"
                );
                return vec![];
            }
        }

        match self.panel {
            PanelState::Closed => {
                tracing::debug!(count = entries.len(), "history push while closed ignored");
                vec![]
            },
            PanelState::Open { history_loaded: true } => {
                tracing::debug!(count = entries.len(), "duplicate history push ignored");
                vec![]
            },
            PanelState::Open { history_loaded: false } => {
                self.panel = PanelState::Open { history_loaded: true };

                let env = &self.env;
                let messages: Vec<Message> = entries
                    .into_iter()
                    .map(|entry| Message::from_history(entry, || env.time_label()))
                    .collect();
                self.messages = messages;

                if self.messages.is_empty() {
                    self.push_notice(self.empty_history_notice());
                }
                vec![WidgetAction::Render]
            },
        }
    }

    /// Apply a live message push.
    ///
    /// Only counterpart messages are appended; echoes of the local role's own
    /// sends were already rendered optimistically. Messages for a different
    /// session are dropped. A pending widget adopts the session id carried by
    /// the first counterpart message.
    pub fn on_message_received(&mut self, push: ReceiveMessage) -> Vec<WidgetAction> {
        if Some(push.sender_type) != self.role.counterpart() {
            tracing::debug!(sender = %push.sender_type, role = %self.role, "non-counterpart message ignored");
            return vec![];
        }

        match (self.session, push.session_id) {
            (SessionBinding::Active(bound), Some(id)) if bound != id => {
                tracing::debug!(bound, session = id, "message for another session ignored");
                return vec![];
            },
            (SessionBinding::Pending, Some(id)) => {
                tracing::debug!(session = id, "session assigned by server");
                self.session = SessionBinding::Active(id);
            },
            _ => {},
        }

        self.messages.push(Message::from_push(push, || self.env.time_label()));
        if !self.panel.is_open() {
            self.unread += 1;
        }
        vec![WidgetAction::Render]
    }

    /// Apply a channel state change.
    ///
    /// Dropping the connection appends exactly one notice. Reconnecting
    /// replays nothing, but re-requests history if this open-cycle has none.
    pub fn on_connection_change(&mut self, state: ConnectionState) -> Vec<WidgetAction> {
        let previous = std::mem::replace(&mut self.connection, state);
        match (previous, state) {
            (ConnectionState::Connected, ConnectionState::Disconnected) => {
                tracing::info!("chat channel disconnected");
                self.history_requests = 0;
                self.push_notice(notice::CONNECTION_LOST);
                vec![WidgetAction::Render]
            },
            (ConnectionState::Disconnected, ConnectionState::Connected) => {
                tracing::info!(role = %self.role, "chat channel connected");
                let mut actions = Vec::new();
                if self.panel == (PanelState::Open { history_loaded: false })
                    && let Some(request) = self.request_history()
                {
                    actions.push(WidgetAction::Emit(request));
                }
                actions.push(WidgetAction::Render);
                actions
            },
            _ => vec![],
        }
    }

    /// The channel could not be established. Nothing is retried.
    pub fn on_channel_failed(&mut self, reason: &str) -> Vec<WidgetAction> {
        tracing::warn!(%reason, "chat channel failed");
        self.push_notice(notice::CHANNEL_FAILED);
        vec![WidgetAction::Render]
    }

    /// A history push could not be read. Reopening the panel asks again.
    pub fn on_history_failed(&mut self, reason: &str) -> Vec<WidgetAction> {
        tracing::warn!(%reason, "history load failed");
        self.push_notice(notice::HISTORY_FAILED);
        vec![WidgetAction::Render]
    }

    /// Rebind to another conversation.
    ///
    /// Closes the panel and clears the list; the next [`ChatWidget::open`]
    /// loads the new conversation. Visitors ignore `customer_id`.
    ///
    /// Outstanding history requests stay counted: their replies still arrive
    /// and must not be taken for the new conversation's history.
    pub fn bind(
        &mut self,
        session: SessionBinding,
        customer_id: Option<CustomerId>,
    ) -> Vec<WidgetAction> {
        self.panel = PanelState::Closed;
        self.session = session;
        self.customer_id = if self.role == SenderRole::Agent { customer_id } else { None };
        self.messages.clear();
        self.unread = 0;
        vec![WidgetAction::Render]
    }

    /// Build a history request and count it as outstanding.
    fn request_history(&mut self) -> Option<OutboundEvent> {
        if self.connection != ConnectionState::Connected {
            return None;
        }
        let session_id = match (self.role, self.session) {
            (SenderRole::Agent, SessionBinding::Active(id)) => Some(id),
            (SenderRole::Agent, SessionBinding::Pending) | (SenderRole::System, _) => return None,
            (SenderRole::Visitor, _) => None,
        };
        self.history_requests += 1;
        Some(OutboundEvent::RequestHistory(RequestHistory { session_id }))
    }

    fn empty_history_notice(&self) -> &'static str {
        match self.role {
            SenderRole::Agent => notice::AGENT_EMPTY_HISTORY,
            _ => notice::VISITOR_WELCOME,
        }
    }

    fn push_notice(&mut self, text: &str) {
        self.messages.push(Message::notice(text, self.env.time_label()));
    }

    /// Role of the local user.
    pub fn role(&self) -> SenderRole {
        self.role
    }

    /// Panel state.
    pub fn panel(&self) -> PanelState {
        self.panel
    }

    /// True when the panel is visible.
    pub fn is_open(&self) -> bool {
        self.panel.is_open()
    }

    /// True once this open-cycle's history push has been applied.
    pub fn history_loaded(&self) -> bool {
        self.panel == PanelState::Open { history_loaded: true }
    }

    /// History requests not yet answered.
    pub fn outstanding_history_requests(&self) -> usize {
        self.history_requests
    }

    /// Channel state as last reported.
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Session binding.
    pub fn session(&self) -> SessionBinding {
        self.session
    }

    /// Customer addressed by agent sends.
    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    /// Visible message list, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages appended while the panel was closed.
    pub fn unread(&self) -> usize {
        self.unread
    }

    /// Whether the send control is enabled, ignoring draft content.
    pub fn send_enabled(&self) -> bool {
        self.connection == ConnectionState::Connected
            && (self.role != SenderRole::Agent || self.customer_id.is_some())
    }
}
