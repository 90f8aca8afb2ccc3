//! Channel event vocabulary.
//!
//! [`OutboundEvent`] covers what a client emits, [`InboundEvent`] what the
//! backend (or the socket layer) delivers. Payload structs mirror the JSON
//! schemas field for field; optional fields are omitted when `None`.

use serde::{Deserialize, Serialize};

use crate::{CustomerId, SenderRole, SessionId};

/// Chat text sent by the local user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    /// Message text, already trimmed and length-checked.
    pub message: String,
    /// Conversation the message belongs to. `None` while the session is
    /// pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Recipient customer (agent sends only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
}

/// Ask the backend to push the conversation history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHistory {
    /// Conversation to load. Visitors leave this empty; the backend resolves
    /// their session from the authenticated connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

/// Events a client emits on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Deliver a chat message.
    SendMessage(SendMessage),
    /// Request conversation history.
    RequestHistory(RequestHistory),
    /// Subscribe the connection to the agent broadcast channel.
    JoinAgentChannel,
}

impl OutboundEvent {
    /// Wire event name for a client acting as `role`.
    pub fn wire_name(&self, role: SenderRole) -> &'static str {
        match (self, role) {
            (Self::SendMessage(_), SenderRole::Agent) => "agent_send_message",
            (Self::SendMessage(_), _) => "send_message",
            (Self::RequestHistory(_), SenderRole::Agent) => "agent_request_history",
            (Self::RequestHistory(_), _) => "request_history",
            (Self::JoinAgentChannel, _) => "agent_join_admin_channel",
        }
    }
}

/// A chat message pushed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveMessage {
    /// Message text.
    pub message: String,
    /// Author role.
    pub sender_type: SenderRole,
    /// Display timestamp (`"%I:%M %p"`). `None` lets the client fill local
    /// time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Conversation the message belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Customer the conversation is with (agent broadcast only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    /// Customer display name (agent broadcast only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

/// One stored message inside a history push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Message text.
    pub message_text: String,
    /// Author role.
    pub sender_type: SenderRole,
    /// Display timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Full conversation history, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    /// Stored messages in chronological order.
    pub history: Vec<HistoryEntry>,
}

/// A customer opened a conversation no agent has seen yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomerSession {
    /// Conversation id.
    #[serde(alias = "session_id")]
    pub id: SessionId,
    /// Customer the conversation is with.
    pub customer_id: CustomerId,
    /// Customer display name.
    pub customer_name: String,
    /// Backend session status (`"open"`, `"active"`, ...).
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "open".to_string()
}

/// Events delivered to a client by the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Socket connected (or reconnected).
    Connect,
    /// Socket dropped.
    Disconnect,
    /// Chat message pushed by the backend.
    ReceiveMessage(ReceiveMessage),
    /// Conversation history in reply to a history request.
    ChatHistory(ChatHistory),
    /// New conversation announced to agents.
    NewCustomerSession(NewCustomerSession),
}

impl InboundEvent {
    /// Wire event name.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::ReceiveMessage(_) => "receive_message",
            Self::ChatHistory(_) => "chat_history",
            Self::NewCustomerSession(_) => "new_customer_session",
        }
    }
}
