//! Message author roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Author of a chat message.
///
/// The backend spells the visitor role `"user"`; some frontends send
/// `"visitor"`. Both decode to [`SenderRole::Visitor`], which always encodes
/// as `"user"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SenderRole {
    /// Customer using the support widget.
    #[serde(rename = "user", alias = "visitor")]
    Visitor,
    /// Support agent answering from the dashboard.
    #[serde(rename = "agent")]
    Agent,
    /// Client-generated notice (welcome line, connection status).
    #[serde(rename = "system")]
    System,
}

impl SenderRole {
    /// The role on the other side of a conversation.
    ///
    /// `None` for [`SenderRole::System`], which never converses.
    pub fn counterpart(self) -> Option<Self> {
        match self {
            Self::Visitor => Some(Self::Agent),
            Self::Agent => Some(Self::Visitor),
            Self::System => None,
        }
    }

    /// Wire spelling of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visitor => "user",
            Self::Agent => "agent",
            Self::System => "system",
        }
    }
}

impl fmt::Display for SenderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
