//! Protocol errors.

use thiserror::Error;

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding channel frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame is not a valid JSON envelope.
    #[error("malformed envelope: {0}")]
    Malformed(String),

    /// Envelope names an event this client does not understand.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Event requires a payload but the envelope carried none.
    #[error("missing payload for event {0}")]
    MissingPayload(String),

    /// Payload does not match the schema of its event.
    #[error("invalid payload for event {event}: {reason}")]
    InvalidPayload {
        /// Wire name of the event.
        event: String,
        /// Decoder error description.
        reason: String,
    },

    /// Payload could not be serialized.
    #[error("failed to encode {event}: {reason}")]
    Encode {
        /// Wire name of the event.
        event: &'static str,
        /// Encoder error description.
        reason: String,
    },
}

impl ProtocolError {
    /// Wire name of the event the error refers to, if one was identified.
    pub fn event(&self) -> Option<&str> {
        match self {
            Self::Malformed(_) => None,
            Self::UnknownEvent(event)
            | Self::MissingPayload(event)
            | Self::InvalidPayload { event, .. } => Some(event.as_str()),
            Self::Encode { event, .. } => Some(*event),
        }
    }
}
