//! Application layer for the live chat
//!
//! Pure state machines and a generic runtime that tie the conversation
//! widget to a concrete frontend, so simulation tests run the same code as
//! the terminal client.
//!
//! # Components
//!
//! - [`App`]: top-level state machine (visitor widget or agent dashboard)
//! - [`AgentDashboard`]: conversation list, routing and customer details
//! - [`ClientConfig`]: role, endpoints and preselection
//! - [`Driver`]: trait for platform-specific I/O
//! - [`Runtime`]: generic orchestration loop using a Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod config;
mod dashboard;
mod driver;
mod event;
mod input;
mod runtime;

pub use action::AppAction;
pub use app::{App, Surface};
pub use config::ClientConfig;
pub use dashboard::{AgentDashboard, Conversation, DetailsPanel};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::UserInput;
pub use runtime::{Runtime, Step};
