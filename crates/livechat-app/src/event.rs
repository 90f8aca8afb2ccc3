//! Application input events.
//!
//! This module defines [`AppEvent`], the full set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from three sources:
//! - User intents, periodic ticks and terminal presentation changes.
//! - The chat channel (decoded inbound events and channel failures).
//! - The customer details API.

use livechat_client::CustomerId;
use livechat_proto::{CustomerDetails, InboundEvent, ProtocolError};

use crate::UserInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// User intent.
    Input(UserInput),

    /// Event delivered by the chat channel.
    Channel(InboundEvent),

    /// The chat channel could not be established.
    ChannelFailed {
        /// Failure description.
        reason: String,
    },

    /// A history push arrived but could not be decoded.
    HistoryFailed {
        /// Failure description.
        reason: String,
    },

    /// Customer details fetched.
    CustomerDetailsLoaded {
        /// Customer the details belong to.
        customer_id: CustomerId,
        /// Fetched details.
        details: CustomerDetails,
    },

    /// Customer details could not be fetched.
    CustomerDetailsFailed {
        /// Customer the request was for.
        customer_id: CustomerId,
        /// Failure description.
        reason: String,
    },

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Local presentation changed (e.g. the input line was edited).
    Redraw,
}

impl AppEvent {
    /// Translate a decoded (or undecodable) channel frame.
    ///
    /// An undecodable `chat_history` frame becomes [`AppEvent::HistoryFailed`]
    /// so the user sees why the conversation is empty. Any other undecodable
    /// frame is dropped.
    pub fn from_channel(frame: Result<InboundEvent, ProtocolError>) -> Option<Self> {
        match frame {
            Ok(event) => Some(Self::Channel(event)),
            Err(e) if e.event() == Some("chat_history") => {
                Some(Self::HistoryFailed { reason: e.to_string() })
            },
            Err(e) => {
                tracing::warn!(error = %e, "dropping undecodable channel frame");
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use livechat_proto::Envelope;

    use super::*;

    #[test]
    fn bad_history_payload_is_reported() {
        let frame = Envelope::decode_inbound(r#"{"event":"chat_history","data":{"history":7}}"#);

        assert!(matches!(AppEvent::from_channel(frame), Some(AppEvent::HistoryFailed { .. })));
    }

    #[test]
    fn unknown_event_is_dropped() {
        let frame = Envelope::decode_inbound(r#"{"event":"typing","data":{}}"#);

        assert_eq!(AppEvent::from_channel(frame), None);
    }

    #[test]
    fn decoded_event_passes_through() {
        let frame = Envelope::decode_inbound(r#"{"event":"connect"}"#);

        assert_eq!(AppEvent::from_channel(frame), Some(AppEvent::Channel(InboundEvent::Connect)));
    }
}
