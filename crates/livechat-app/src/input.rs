//! Frontend-agnostic user intents.

use livechat_client::{CustomerId, SessionId};

/// What the user asked for.
///
/// Decouples application logic from the terminal (or any other frontend),
/// enabling deterministic simulation testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// Show the conversation panel.
    Open,
    /// Hide the conversation panel.
    Close,
    /// Flip panel visibility.
    Toggle,
    /// Send the typed draft.
    Submit(String),
    /// Agent: switch to a conversation from the list.
    Select(SessionId),
    /// Agent: start a conversation with a customer who has none.
    NewChat(CustomerId),
    /// Agent: show the customer details panel.
    ShowDetails,
    /// Agent: hide the customer details panel.
    HideDetails,
    /// Leave the application.
    Quit,
}
