//! Live-chat wire protocol
//!
//! One typed vocabulary for everything that crosses the real-time channel
//! between a chat client (visitor widget or agent dashboard) and the support
//! backend.
//!
//! # Wire format
//!
//! Every channel frame is a JSON text envelope:
//!
//! ```json
//! {"event": "receive_message", "data": {"message": "hi", "sender_type": "agent"}}
//! ```
//!
//! `data` is omitted for events without a payload (`connect`, `disconnect`,
//! `agent_join_admin_channel`).
//!
//! Outbound wire names depend on the local role: a visitor emits
//! `send_message`, an agent emits `agent_send_message`. Callers never spell
//! those names themselves; they build an [`OutboundEvent`] and let
//! [`OutboundEvent::wire_name`] pick the name.
//!
//! # Components
//!
//! - [`SenderRole`]: who authored a message
//! - [`OutboundEvent`] / [`InboundEvent`]: the event vocabulary
//! - [`Envelope`]: JSON framing and codec entry points
//! - [`CustomerDetails`]: the user-details HTTP payload

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod customer;
mod envelope;
mod error;
pub mod events;
mod role;

pub use customer::CustomerDetails;
pub use envelope::Envelope;
pub use error::{ProtocolError, Result};
pub use events::{InboundEvent, OutboundEvent};
pub use role::SenderRole;

/// Server-issued conversation identifier.
pub type SessionId = u64;

/// Backend identifier of a customer account.
pub type CustomerId = u64;

/// Maximum message length, in Unicode scalar values.
pub const MAX_MESSAGE_CHARS: usize = 500;
