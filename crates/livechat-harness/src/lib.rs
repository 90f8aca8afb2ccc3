//! Deterministic simulation harness for the live-chat clients.
//!
//! In-memory implementations of the [`livechat_app::Driver`] and
//! [`livechat_client::Environment`] traits, plus a simulated support backend
//! that speaks the real JSON envelope format, so whole conversations run
//! through the production [`livechat_app::Runtime`] without sockets or
//! clocks.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the common
//! widget and dashboard invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_backend;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    ActiveConversationListed, ClientSnapshot, Invariant, InvariantRegistry, InvariantResult,
    LocalAuthorship, MessageLength, MessageSnapshot, SystemSnapshot, UniqueConversations,
    UnreadOnlyWhenClosed, Violation,
};
pub use sim_backend::{ConnectionId, SessionRecord, SharedBackend, SimBackend, StoredMessage};
pub use sim_driver::{SimDriver, SimDriverError};
pub use sim_env::SimEnv;
