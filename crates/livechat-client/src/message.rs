//! Visible message list entries.

use livechat_proto::{
    SenderRole,
    events::{HistoryEntry, ReceiveMessage},
};

/// Where a visible message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Created by this client: an optimistic send or a system notice. Never
    /// confirmed by the backend.
    Local,
    /// Delivered by the channel (history or live push).
    Remote,
}

/// A message in the visible list. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message text.
    pub text: String,
    /// Author role.
    pub role: SenderRole,
    /// Display timestamp label.
    pub sent_at: String,
    /// Local or channel-delivered.
    pub origin: Origin,
}

impl Message {
    /// A message authored on this client.
    pub fn local(text: impl Into<String>, role: SenderRole, sent_at: String) -> Self {
        Self { text: text.into(), role, sent_at, origin: Origin::Local }
    }

    /// A client-generated system notice.
    pub fn notice(text: impl Into<String>, sent_at: String) -> Self {
        Self::local(text, SenderRole::System, sent_at)
    }

    /// A stored history entry. `fallback_time` fills a missing timestamp.
    pub fn from_history(entry: HistoryEntry, fallback_time: impl FnOnce() -> String) -> Self {
        Self {
            text: entry.message_text,
            role: entry.sender_type,
            sent_at: entry.timestamp.unwrap_or_else(fallback_time),
            origin: Origin::Remote,
        }
    }

    /// A live push. `fallback_time` fills a missing timestamp.
    pub fn from_push(push: ReceiveMessage, fallback_time: impl FnOnce() -> String) -> Self {
        Self {
            text: push.message,
            role: push.sender_type,
            sent_at: push.timestamp.unwrap_or_else(fallback_time),
            origin: Origin::Remote,
        }
    }

    /// True for system notices.
    pub fn is_system(&self) -> bool {
        self.role == SenderRole::System
    }
}
