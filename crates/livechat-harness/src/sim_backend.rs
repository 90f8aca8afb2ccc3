//! Simulated support backend.
//!
//! An in-memory model of the chat server that consumes and produces the real
//! JSON envelopes, so simulations exercise the wire codec end to end.
//!
//! # Model
//!
//! - Each customer has one persistent session, created on first contact.
//! - Visitor messages are broadcast to agents that joined the agent channel;
//!   the visitor's own connection gets no echo.
//! - Agent messages are delivered to every connection of the addressed
//!   customer only.
//! - `receive_message` carries only the text, sender, session id and
//!   timestamp. Customer identity reaches agents through
//!   `new_customer_session` alone.
//! - History replies go only to the requesting connection.
//! - The first visitor message of a session announces it to agents with
//!   `new_customer_session`.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

use livechat_client::Environment;
use livechat_proto::{
    CustomerDetails, CustomerId, Envelope, InboundEvent, OutboundEvent, ProtocolError,
    SenderRole, SessionId,
    events::{ChatHistory, HistoryEntry, NewCustomerSession, ReceiveMessage},
};

use crate::SimEnv;

/// Longest message the backend stores.
const MAX_STORED_CHARS: usize = 2000;

/// Backend handle shared by every simulated client.
pub type SharedBackend = Arc<Mutex<SimBackend>>;

/// Identifies one simulated socket.
pub type ConnectionId = u64;

/// A message as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// Message text.
    pub text: String,
    /// Author role.
    pub sender: SenderRole,
    /// Timestamp label.
    pub timestamp: String,
}

/// A customer's persistent conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Session id.
    pub id: SessionId,
    /// Customer the session belongs to.
    pub customer_id: CustomerId,
    /// `open` until an agent writes, then `active`.
    pub status: String,
    /// Stored messages, oldest first.
    pub messages: Vec<StoredMessage>,
    /// Whether agents were told about this session.
    announced: bool,
}

#[derive(Debug)]
struct Connection {
    role: SenderRole,
    customer_id: Option<CustomerId>,
    in_agent_channel: bool,
    outbox: Vec<String>,
}

#[derive(Debug, Clone)]
struct Customer {
    name: String,
    details: CustomerDetails,
}

/// In-memory chat backend.
#[derive(Debug)]
pub struct SimBackend {
    env: SimEnv,
    customers: HashMap<CustomerId, Customer>,
    sessions: BTreeMap<SessionId, SessionRecord>,
    connections: BTreeMap<ConnectionId, Connection>,
    next_session: SessionId,
    next_connection: ConnectionId,
}

impl Default for SimBackend {
    fn default() -> Self {
        Self::new(SimEnv::new())
    }
}

impl SimBackend {
    /// Empty backend stamping messages with `env`.
    pub fn new(env: SimEnv) -> Self {
        Self {
            env,
            customers: HashMap::new(),
            sessions: BTreeMap::new(),
            connections: BTreeMap::new(),
            next_session: 1,
            next_connection: 1,
        }
    }

    /// Wrap in a shared handle.
    pub fn shared(self) -> SharedBackend {
        Arc::new(Mutex::new(self))
    }

    /// Register a customer account.
    pub fn add_customer(&mut self, id: CustomerId, name: &str, details: CustomerDetails) {
        self.customers.insert(id, Customer { name: name.to_string(), details });
    }

    /// Open a visitor socket for an authenticated customer.
    pub fn connect_visitor(&mut self, customer_id: CustomerId) -> ConnectionId {
        self.open(SenderRole::Visitor, Some(customer_id))
    }

    /// Open an agent socket.
    pub fn connect_agent(&mut self) -> ConnectionId {
        self.open(SenderRole::Agent, None)
    }

    fn open(&mut self, role: SenderRole, customer_id: Option<CustomerId>) -> ConnectionId {
        let id = self.next_connection;
        self.next_connection += 1;

        let mut connection =
            Connection { role, customer_id, in_agent_channel: false, outbox: Vec::new() };
        push_frame(&mut connection.outbox, &InboundEvent::Connect);
        self.connections.insert(id, connection);

        tracing::debug!(connection = id, %role, ?customer_id, "sim connection opened");
        id
    }

    /// Close a socket. Its pending frames are discarded.
    pub fn disconnect(&mut self, connection: ConnectionId) {
        self.connections.remove(&connection);
    }

    /// Drop a socket from the server side. The client sees `disconnect`.
    pub fn drop_connection(&mut self, connection: ConnectionId) {
        if let Some(conn) = self.connections.get_mut(&connection) {
            push_frame(&mut conn.outbox, &InboundEvent::Disconnect);
            conn.in_agent_channel = false;
        }
    }

    /// Take every frame queued for a socket.
    pub fn take_frames(&mut self, connection: ConnectionId) -> Vec<String> {
        self.connections
            .get_mut(&connection)
            .map(|c| std::mem::take(&mut c.outbox))
            .unwrap_or_default()
    }

    /// Handle a text frame sent by a client.
    ///
    /// Frames from unknown sockets and events a role may not send are
    /// dropped, as the real backend does.
    pub fn receive(&mut self, connection: ConnectionId, text: &str) -> Result<(), ProtocolError> {
        let (wire_role, event) = Envelope::decode_outbound(text)?;
        let Some(conn) = self.connections.get(&connection) else {
            tracing::debug!(connection, "frame from closed connection dropped");
            return Ok(());
        };
        let (role, customer_id) = (conn.role, conn.customer_id);

        match (role, wire_role, event) {
            (SenderRole::Agent, SenderRole::Agent, OutboundEvent::JoinAgentChannel) => {
                if let Some(conn) = self.connections.get_mut(&connection) {
                    conn.in_agent_channel = true;
                }
            },
            (SenderRole::Visitor, SenderRole::Visitor, OutboundEvent::SendMessage(send)) => {
                if let Some(customer_id) = customer_id {
                    self.visitor_message(customer_id, send.message);
                }
            },
            (SenderRole::Agent, SenderRole::Agent, OutboundEvent::SendMessage(send)) => {
                if let Some(customer_id) = send.customer_id {
                    self.agent_message(customer_id, send.message);
                }
            },
            (SenderRole::Visitor, SenderRole::Visitor, OutboundEvent::RequestHistory(_)) => {
                if let Some(customer_id) = customer_id {
                    let session_id = self.session_for(customer_id);
                    self.send_history(connection, session_id);
                }
            },
            (SenderRole::Agent, SenderRole::Agent, OutboundEvent::RequestHistory(request)) => {
                if let Some(session_id) = request.session_id {
                    self.send_history(connection, session_id);
                }
            },
            (role, wire_role, event) => {
                tracing::debug!(%role, %wire_role, ?event, "event not allowed for role dropped");
            },
        }
        Ok(())
    }

    fn visitor_message(&mut self, customer_id: CustomerId, text: String) {
        if !accepts(&text) {
            return;
        }
        let session_id = self.session_for(customer_id);
        let timestamp = self.env.time_label();
        let customer_name = self.customer_name(customer_id);

        let Some(session) = self.sessions.get_mut(&session_id) else {
            return;
        };
        session.messages.push(StoredMessage {
            text: text.clone(),
            sender: SenderRole::Visitor,
            timestamp: timestamp.clone(),
        });

        let announce = !session.announced;
        session.announced = true;
        let status = session.status.clone();

        if announce {
            self.to_agents(&InboundEvent::NewCustomerSession(NewCustomerSession {
                id: session_id,
                customer_id,
                customer_name,
                status,
            }));
        }
        self.to_agents(&InboundEvent::ReceiveMessage(ReceiveMessage {
            message: text,
            sender_type: SenderRole::Visitor,
            timestamp: Some(timestamp),
            session_id: Some(session_id),
            customer_id: None,
            customer_name: None,
        }));
    }

    fn agent_message(&mut self, customer_id: CustomerId, text: String) {
        if !accepts(&text) {
            return;
        }
        let session_id = self.session_for(customer_id);
        let timestamp = self.env.time_label();

        let Some(session) = self.sessions.get_mut(&session_id) else {
            return;
        };
        session.status = "active".to_string();
        session.announced = true;
        session.messages.push(StoredMessage {
            text: text.clone(),
            sender: SenderRole::Agent,
            timestamp: timestamp.clone(),
        });

        let event = InboundEvent::ReceiveMessage(ReceiveMessage {
            message: text,
            sender_type: SenderRole::Agent,
            timestamp: Some(timestamp),
            session_id: Some(session_id),
            customer_id: None,
            customer_name: None,
        });
        for conn in self.connections.values_mut() {
            if conn.role == SenderRole::Visitor && conn.customer_id == Some(customer_id) {
                push_frame(&mut conn.outbox, &event);
            }
        }
    }

    fn send_history(&mut self, connection: ConnectionId, session_id: SessionId) {
        let Some(session) = self.sessions.get(&session_id) else {
            tracing::debug!(session = session_id, "history for unknown session dropped");
            return;
        };
        let history = session
            .messages
            .iter()
            .map(|m| HistoryEntry {
                message_text: m.text.clone(),
                sender_type: m.sender,
                timestamp: Some(m.timestamp.clone()),
            })
            .collect();

        if let Some(conn) = self.connections.get_mut(&connection) {
            push_frame(&mut conn.outbox, &InboundEvent::ChatHistory(ChatHistory { history }));
        }
    }

    fn to_agents(&mut self, event: &InboundEvent) {
        for conn in self.connections.values_mut().filter(|c| c.in_agent_channel) {
            push_frame(&mut conn.outbox, event);
        }
    }

    fn session_for(&mut self, customer_id: CustomerId) -> SessionId {
        if let Some(session) = self.sessions.values().find(|s| s.customer_id == customer_id) {
            return session.id;
        }

        let id = self.next_session;
        self.next_session += 1;
        self.sessions.insert(id, SessionRecord {
            id,
            customer_id,
            status: "open".to_string(),
            messages: Vec::new(),
            announced: false,
        });
        id
    }

    fn customer_name(&self, customer_id: CustomerId) -> String {
        self.customers
            .get(&customer_id)
            .map_or_else(|| format!("Customer {customer_id}"), |c| c.name.clone())
    }

    /// Details served by the user-details endpoint.
    pub fn customer_details(&self, customer_id: CustomerId) -> Option<&CustomerDetails> {
        self.customers.get(&customer_id).map(|c| &c.details)
    }

    /// Look up a session.
    pub fn session(&self, session_id: SessionId) -> Option<&SessionRecord> {
        self.sessions.get(&session_id)
    }

    /// Session of a customer, if one exists.
    pub fn session_of(&self, customer_id: CustomerId) -> Option<&SessionRecord> {
        self.sessions.values().find(|s| s.customer_id == customer_id)
    }
}

fn accepts(text: &str) -> bool {
    !text.is_empty() && text.chars().count() <= MAX_STORED_CHARS
}

fn push_frame(outbox: &mut Vec<String>, event: &InboundEvent) {
    match Envelope::encode_inbound(event) {
        Ok(text) => outbox.push(text),
        Err(e) => tracing::warn!(error = %e, "sim backend failed to encode frame"),
    }
}
