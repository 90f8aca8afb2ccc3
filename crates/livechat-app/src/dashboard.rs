//! Agent dashboard state machine.
//!
//! The dashboard owns the agent's conversation list, the conversation pane
//! (an agent-role [`ChatWidget`]) and the customer details panel. It routes
//! every channel event to the right place:
//!
//! - Echoes of agent messages are dropped; they were rendered when sent.
//! - A message for the active conversation goes to the pane.
//! - A message for another listed conversation marks it unread and updates
//!   its preview.
//! - A message for an unlisted conversation adds it at the top of the list.
//!
//! # Invariants
//!
//! - Conversations are unique by session id; newest first.
//! - The active conversation, when set, is in the list.
//! - The pane is bound to the active conversation, or is a pending new chat
//!   when no conversation is active.

use livechat_client::{
    ChatWidget, ConnectionState, CustomerId, Environment, SendRejected, SenderRole,
    SessionBinding, SessionId,
};
use livechat_proto::{
    CustomerDetails, InboundEvent, OutboundEvent,
    events::{NewCustomerSession, ReceiveMessage},
};

use crate::{AppAction, action::lift};

/// One entry of the agent's conversation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// Server-issued session id.
    pub session_id: SessionId,
    /// Customer the conversation is with, when known.
    pub customer_id: Option<CustomerId>,
    /// Customer display name.
    pub customer_name: String,
    /// Backend session status.
    pub status: String,
    /// Last message seen in this conversation.
    pub preview: Option<String>,
    /// Unread dot.
    pub unread: bool,
}

impl Conversation {
    /// A conversation announced by `new_customer_session`.
    pub fn from_announcement(session: NewCustomerSession) -> Self {
        Self {
            session_id: session.id,
            customer_id: Some(session.customer_id),
            customer_name: session.customer_name,
            status: session.status,
            preview: None,
            unread: true,
        }
    }

    fn from_message(session_id: SessionId, message: &ReceiveMessage) -> Self {
        let customer_name = match (&message.customer_name, message.customer_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("Customer {id}"),
            (None, None) => format!("Session {session_id}"),
        };
        Self {
            session_id,
            customer_id: message.customer_id,
            customer_name,
            status: "open".to_string(),
            preview: Some(message.message.clone()),
            unread: true,
        }
    }
}

/// Customer details panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailsPanel {
    /// Not shown.
    #[default]
    Hidden,
    /// Fetch in flight.
    Loading {
        /// Customer being fetched.
        customer_id: CustomerId,
    },
    /// Details available.
    Loaded {
        /// Customer shown.
        customer_id: CustomerId,
        /// Fetched details.
        details: CustomerDetails,
    },
    /// Fetch failed.
    Failed {
        /// Customer the fetch was for.
        customer_id: CustomerId,
        /// Failure description.
        reason: String,
    },
}

impl DetailsPanel {
    /// Customer the panel refers to.
    pub fn customer_id(&self) -> Option<CustomerId> {
        match self {
            Self::Hidden => None,
            Self::Loading { customer_id }
            | Self::Loaded { customer_id, .. }
            | Self::Failed { customer_id, .. } => Some(*customer_id),
        }
    }
}

/// Agent dashboard: conversation list, conversation pane and details panel.
#[derive(Debug, Clone)]
pub struct AgentDashboard<E: Environment> {
    /// Conversations, newest first.
    conversations: Vec<Conversation>,
    /// Selected conversation. `None` before any selection or during a new
    /// chat.
    active: Option<SessionId>,
    /// Conversation pane.
    widget: ChatWidget<E>,
    /// Customer details panel.
    details: DetailsPanel,
}

impl<E: Environment> AgentDashboard<E> {
    /// Empty dashboard.
    pub fn new(env: E) -> Self {
        Self {
            conversations: Vec::new(),
            active: None,
            widget: ChatWidget::agent(env),
            details: DetailsPanel::Hidden,
        }
    }

    /// Apply the start-up selection.
    ///
    /// A configured session is listed and selected. Without one, a configured
    /// customer gets a new-chat placeholder.
    pub fn preselect(
        &mut self,
        session: Option<SessionId>,
        customer_id: Option<CustomerId>,
        customer_name: Option<String>,
    ) -> Vec<AppAction> {
        match (session, customer_id) {
            (Some(session_id), _) => {
                if self.position(session_id).is_none() {
                    let customer_name = customer_name.unwrap_or_else(|| match customer_id {
                        Some(id) => format!("Customer {id}"),
                        None => format!("Session {session_id}"),
                    });
                    self.conversations.insert(0, Conversation {
                        session_id,
                        customer_id,
                        customer_name,
                        status: "open".to_string(),
                        preview: None,
                        unread: false,
                    });
                }
                self.select(session_id)
            },
            (None, Some(customer_id)) => self.start_new_chat(customer_id),
            (None, None) => vec![],
        }
    }

    /// Switch the pane to a listed conversation.
    ///
    /// Clears its unread dot, rebinds and opens the pane (which requests
    /// history) and starts a details fetch for its customer.
    pub fn select(&mut self, session_id: SessionId) -> Vec<AppAction> {
        let Some(conversation) = self.conversation_mut(session_id) else {
            tracing::warn!(session = session_id, "select of unlisted conversation ignored");
            return vec![];
        };
        conversation.unread = false;
        let customer_id = conversation.customer_id;

        if self.active == Some(session_id) && self.widget.is_open() {
            return vec![AppAction::Render];
        }

        tracing::debug!(session = session_id, ?customer_id, "conversation selected");
        self.active = Some(session_id);
        let mut actions = lift(self.widget.bind(SessionBinding::Active(session_id), customer_id));
        actions.extend(lift(self.widget.open()));
        actions.extend(self.load_details(customer_id));
        actions
    }

    /// Start a conversation with a customer.
    ///
    /// A customer who already has a listed conversation gets it selected.
    /// Otherwise the pane shows a pending new chat the agent can type into;
    /// the session is adopted from the customer's first reply.
    pub fn start_new_chat(&mut self, customer_id: CustomerId) -> Vec<AppAction> {
        if let Some(existing) =
            self.conversations.iter().find(|c| c.customer_id == Some(customer_id))
        {
            let session_id = existing.session_id;
            return self.select(session_id);
        }

        tracing::debug!(customer = customer_id, "new chat started");
        self.active = None;
        let mut actions = lift(self.widget.bind(SessionBinding::Pending, Some(customer_id)));
        actions.extend(lift(self.widget.open()));
        actions.extend(self.load_details(Some(customer_id)));
        actions
    }

    /// Send a message in the pane.
    pub fn submit(&mut self, text: &str) -> Result<Vec<AppAction>, SendRejected> {
        let actions = lift(self.widget.send(text)?);

        let preview = self.widget.messages().last().map(|m| m.text.clone());
        if let Some(session_id) = self.active
            && let Some(conversation) = self.conversation_mut(session_id)
        {
            conversation.preview = preview;
        }
        Ok(actions)
    }

    /// Show the panel.
    pub fn open(&mut self) -> Vec<AppAction> {
        lift(self.widget.open())
    }

    /// Hide the panel.
    pub fn close(&mut self) -> Vec<AppAction> {
        lift(self.widget.close())
    }

    /// Flip panel visibility.
    pub fn toggle(&mut self) -> Vec<AppAction> {
        lift(self.widget.toggle())
    }

    /// Route a channel event.
    pub fn handle_inbound(&mut self, event: InboundEvent) -> Vec<AppAction> {
        match event {
            InboundEvent::Connect => {
                let mut actions = vec![AppAction::Emit(OutboundEvent::JoinAgentChannel)];
                actions.extend(lift(self.widget.on_connection_change(ConnectionState::Connected)));
                actions
            },
            InboundEvent::Disconnect => {
                lift(self.widget.on_connection_change(ConnectionState::Disconnected))
            },
            InboundEvent::ChatHistory(history) => {
                lift(self.widget.on_history_received(history.history))
            },
            InboundEvent::ReceiveMessage(message) => self.route_message(message),
            InboundEvent::NewCustomerSession(session) => self.on_new_session(session),
        }
    }

    fn route_message(&mut self, message: ReceiveMessage) -> Vec<AppAction> {
        if message.sender_type != SenderRole::Visitor {
            tracing::debug!(sender = %message.sender_type, "non-customer message ignored");
            return vec![];
        }
        let Some(session_id) = message.session_id else {
            tracing::debug!("customer message without session ignored");
            return vec![];
        };

        if self.active == Some(session_id) {
            if let Some(conversation) = self.conversation_mut(session_id) {
                conversation.preview = Some(message.message.clone());
            }
            return lift(self.widget.on_message_received(message));
        }

        if let Some(customer_id) = self.new_chat_reply(session_id, &message) {
            tracing::debug!(session = session_id, customer = customer_id, "new chat adopted");
            match self.conversation_mut(session_id) {
                Some(conversation) => {
                    conversation.unread = false;
                    conversation.preview = Some(message.message.clone());
                },
                None => {
                    let mut conversation = Conversation::from_message(session_id, &message);
                    if conversation.customer_id.is_none() {
                        conversation.customer_id = Some(customer_id);
                        conversation.customer_name = message
                            .customer_name
                            .clone()
                            .unwrap_or_else(|| format!("Customer {customer_id}"));
                    }
                    conversation.unread = false;
                    self.conversations.insert(0, conversation);
                },
            }
            self.active = Some(session_id);
            return lift(self.widget.on_message_received(message));
        }

        match self.conversation_mut(session_id) {
            Some(conversation) => {
                conversation.unread = true;
                conversation.preview = Some(message.message);
            },
            None => {
                tracing::debug!(session = session_id, "message for unlisted conversation");
                self.conversations.insert(0, Conversation::from_message(session_id, &message));
            },
        }
        vec![AppAction::Render]
    }

    /// Customer of a pending new chat that `message` answers.
    ///
    /// Customer messages normally carry only the session id. While a new
    /// chat is pending, the first message for a session nobody has listed
    /// yet is taken as its reply; a listed session or an explicit customer
    /// id must match the pending customer.
    fn new_chat_reply(
        &self,
        session_id: SessionId,
        message: &ReceiveMessage,
    ) -> Option<CustomerId> {
        if self.active.is_some() || self.widget.session() != SessionBinding::Pending {
            return None;
        }
        let pending = self.widget.customer_id()?;

        let matches = match (message.customer_id, self.conversation(session_id)) {
            (Some(customer_id), _) => customer_id == pending,
            (None, Some(listed)) => listed.customer_id == Some(pending),
            (None, None) => true,
        };
        matches.then_some(pending)
    }

    fn on_new_session(&mut self, session: NewCustomerSession) -> Vec<AppAction> {
        if self.position(session.id).is_some() {
            tracing::debug!(session = session.id, "duplicate session announcement ignored");
            return vec![];
        }
        tracing::info!(session = session.id, customer = session.customer_id, "new customer session");
        self.conversations.insert(0, Conversation::from_announcement(session));
        vec![AppAction::Render]
    }

    /// Show the details panel for the pane's customer.
    pub fn show_details(&mut self) -> Vec<AppAction> {
        let Some(customer_id) = self.widget.customer_id() else {
            return vec![];
        };
        let showing = matches!(self.details, DetailsPanel::Loading { .. } | DetailsPanel::Loaded { .. })
            && self.details.customer_id() == Some(customer_id);
        if showing {
            return vec![];
        }

        let mut actions = self.load_details(Some(customer_id));
        actions.push(AppAction::Render);
        actions
    }

    /// Hide the details panel.
    pub fn hide_details(&mut self) -> Vec<AppAction> {
        self.details = DetailsPanel::Hidden;
        vec![AppAction::Render]
    }

    /// A details fetch finished. Results for a customer the panel no longer
    /// shows are dropped.
    pub fn on_details_loaded(
        &mut self,
        customer_id: CustomerId,
        details: CustomerDetails,
    ) -> Vec<AppAction> {
        if self.details != (DetailsPanel::Loading { customer_id }) {
            tracing::debug!(customer = customer_id, "stale customer details dropped");
            return vec![];
        }
        self.details = DetailsPanel::Loaded { customer_id, details };
        vec![AppAction::Render]
    }

    /// A details fetch failed.
    pub fn on_details_failed(&mut self, customer_id: CustomerId, reason: String) -> Vec<AppAction> {
        if self.details != (DetailsPanel::Loading { customer_id }) {
            return vec![];
        }
        tracing::warn!(customer = customer_id, %reason, "customer details unavailable");
        self.details = DetailsPanel::Failed { customer_id, reason };
        vec![AppAction::Render]
    }

    fn load_details(&mut self, customer_id: Option<CustomerId>) -> Vec<AppAction> {
        match customer_id {
            Some(customer_id) => {
                self.details = DetailsPanel::Loading { customer_id };
                vec![AppAction::FetchCustomerDetails { customer_id }]
            },
            None => {
                self.details = DetailsPanel::Hidden;
                vec![]
            },
        }
    }

    fn position(&self, session_id: SessionId) -> Option<usize> {
        self.conversations.iter().position(|c| c.session_id == session_id)
    }

    fn conversation_mut(&mut self, session_id: SessionId) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.session_id == session_id)
    }

    /// Conversations, newest first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Look up a conversation.
    pub fn conversation(&self, session_id: SessionId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.session_id == session_id)
    }

    /// Selected conversation.
    pub fn active(&self) -> Option<SessionId> {
        self.active
    }

    /// Conversation pane.
    pub fn widget(&self) -> &ChatWidget<E> {
        &self.widget
    }

    pub(crate) fn widget_mut(&mut self) -> &mut ChatWidget<E> {
        &mut self.widget
    }

    /// Customer details panel.
    pub fn details(&self) -> &DetailsPanel {
        &self.details
    }
}
