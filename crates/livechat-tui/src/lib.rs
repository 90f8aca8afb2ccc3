//! Terminal UI for the live-chat client
//!
//! A thin shell over [`livechat_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`livechat_app::Runtime`]
//!
//! This crate only handles terminal rendering, key handling and the wiring of
//! the WebSocket channel and the customer details API.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod input;
pub mod terminal;
pub mod ui;

pub use commands::{Command, CommandError};
pub use input::{InputState, KeyInput};
pub use livechat_app::{App, AppAction, AppEvent, Driver, Runtime, UserInput};
pub use terminal::{TerminalDriver, TerminalError};
