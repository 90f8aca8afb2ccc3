//! Client configuration.

use livechat_client::{CustomerId, SenderRole, SessionId};

/// Configuration for one chat client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Local role. `Agent` runs the dashboard; anything else runs the
    /// visitor widget.
    pub role: SenderRole,
    /// Chat channel URL (e.g., "ws://127.0.0.1:5000/socket")
    pub server_url: String,
    /// Base URL of the HTTP API (e.g., "http://127.0.0.1:5000")
    pub api_base: String,
    /// Agent: conversation to select at start-up.
    pub preselected_session: Option<SessionId>,
    /// Agent: customer of the preselected conversation, or the customer to
    /// start a new chat with when no session is given.
    pub preselected_customer: Option<CustomerId>,
    /// Agent: display name of the preselected customer.
    pub preselected_name: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            role: SenderRole::Visitor,
            server_url: "ws://127.0.0.1:5000/socket".to_string(),
            api_base: "http://127.0.0.1:5000".to_string(),
            preselected_session: None,
            preselected_customer: None,
            preselected_name: None,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Default configuration for an agent.
    pub fn agent() -> Self {
        Self { role: SenderRole::Agent, ..Self::default() }
    }

    /// True when this client runs the agent dashboard.
    pub fn is_agent(&self) -> bool {
        self.role == SenderRole::Agent
    }
}
