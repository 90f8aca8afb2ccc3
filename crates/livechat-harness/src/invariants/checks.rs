//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::collections::HashSet;

use livechat_client::{MAX_MESSAGE_CHARS, Origin, SenderRole};

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// The unread counter only grows while the panel is closed and is cleared on
/// open, so a visible panel never shows unread messages.
pub struct UnreadOnlyWhenClosed;

impl Invariant for UnreadOnlyWhenClosed {
    fn name(&self) -> &'static str {
        "unread_only_when_closed"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            if client.panel_open && client.unread > 0 {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("client {}: panel open with {} unread", client.id, client.unread),
                });
            }
        }
        Ok(())
    }
}

/// Messages created on a client are the local user's sends or system
/// notices. Anything authored by the counterpart came through the channel.
pub struct LocalAuthorship;

impl Invariant for LocalAuthorship {
    fn name(&self) -> &'static str {
        "local_authorship"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let foreign = client.messages.iter().find(|m| {
                m.origin == Origin::Local && m.role != client.role && m.role != SenderRole::System
            });
            if let Some(message) = foreign {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {} ({}): local message {:?} authored by {}",
                        client.id, client.role, message.text, message.role
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Every sent message was trimmed, non-empty and within the length limit.
pub struct MessageLength;

impl Invariant for MessageLength {
    fn name(&self) -> &'static str {
        "message_length"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            for message in client.messages.iter().filter(|m| m.origin == Origin::Local) {
                if message.role == SenderRole::System {
                    continue;
                }
                let len = message.text.chars().count();
                if len == 0 || len > MAX_MESSAGE_CHARS || message.text.trim() != message.text {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "client {}: sent message of {len} chars not normalized: {:?}",
                            client.id, message.text
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The selected conversation is in the conversation list.
pub struct ActiveConversationListed;

impl Invariant for ActiveConversationListed {
    fn name(&self) -> &'static str {
        "active_conversation_listed"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            if let Some(active) = client.active_session
                && !client.conversations.contains(&active)
            {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {}: active session {active} not in {:?}",
                        client.id, client.conversations
                    ),
                });
            }
        }
        Ok(())
    }
}

/// A session appears at most once in a conversation list.
pub struct UniqueConversations;

impl Invariant for UniqueConversations {
    fn name(&self) -> &'static str {
        "unique_conversations"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let mut seen = HashSet::new();
            if let Some(dup) = client.conversations.iter().find(|id| !seen.insert(**id)) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("client {}: session {dup} listed twice", client.id),
                });
            }
        }
        Ok(())
    }
}
