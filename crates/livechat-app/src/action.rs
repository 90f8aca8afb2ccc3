//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use livechat_client::{CustomerId, WidgetAction};
use livechat_proto::OutboundEvent;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Emit an event on the chat channel.
    Emit(OutboundEvent),

    /// Fetch a customer's details from the HTTP API.
    FetchCustomerDetails {
        /// Customer to look up.
        customer_id: CustomerId,
    },

    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,
}

impl From<WidgetAction> for AppAction {
    fn from(action: WidgetAction) -> Self {
        match action {
            WidgetAction::Emit(event) => Self::Emit(event),
            WidgetAction::Render => Self::Render,
        }
    }
}

/// Lift widget actions into app actions.
pub(crate) fn lift(actions: Vec<WidgetAction>) -> Vec<AppAction> {
    actions.into_iter().map(AppAction::from).collect()
}
