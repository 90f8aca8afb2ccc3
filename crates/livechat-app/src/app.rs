//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages what the
//! user sees completely decoupled from I/O.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Hosts the visitor widget or the agent dashboard, per configured role.
//! - Routes user intents and channel events to that surface.
//! - Holds a transient status line (e.g., why a send was refused).

use livechat_client::{ChatWidget, ConnectionState, Environment, SenderRole, WidgetAction};
use livechat_proto::InboundEvent;

use crate::{AgentDashboard, AppAction, AppEvent, ClientConfig, UserInput, action::lift};

/// What the app shows.
#[derive(Debug, Clone)]
pub enum Surface<E: Environment> {
    /// Customer-facing floating widget.
    Visitor(ChatWidget<E>),
    /// Support agent dashboard.
    Agent(AgentDashboard<E>),
}

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App<E: Environment> {
    /// Configuration the app was started with.
    config: ClientConfig,
    /// Visitor widget or agent dashboard.
    surface: Surface<E>,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
    /// Terminal size (columns, rows).
    terminal_size: (u16, u16),
}

impl<E: Environment> App<E> {
    /// Create a new App for the configured role.
    pub fn new(config: ClientConfig, env: E) -> Self {
        let surface = if config.is_agent() {
            Surface::Agent(AgentDashboard::new(env))
        } else {
            Surface::Visitor(ChatWidget::visitor(env))
        };
        Self { config, surface, status_message: None, terminal_size: (80, 24) }
    }

    /// Actions to run once before the channel connects.
    pub fn start(&mut self) -> Vec<AppAction> {
        let mut actions = match &mut self.surface {
            Surface::Visitor(_) => vec![],
            Surface::Agent(dashboard) => dashboard.preselect(
                self.config.preselected_session,
                self.config.preselected_customer,
                self.config.preselected_name.clone(),
            ),
        };
        actions.push(AppAction::Render);
        actions
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Redraw => vec![AppAction::Render],
            AppEvent::Input(input) => self.handle_input(input),
            AppEvent::Channel(event) => match &mut self.surface {
                Surface::Visitor(widget) => lift(visitor_inbound(widget, event)),
                Surface::Agent(dashboard) => dashboard.handle_inbound(event),
            },
            AppEvent::ChannelFailed { reason } => {
                let actions = lift(self.widget_mut().on_channel_failed(&reason));
                self.status_message = Some(format!("Error: {reason}"));
                actions
            },
            AppEvent::HistoryFailed { reason } => lift(self.widget_mut().on_history_failed(&reason)),
            AppEvent::CustomerDetailsLoaded { customer_id, details } => match &mut self.surface {
                Surface::Agent(dashboard) => dashboard.on_details_loaded(customer_id, details),
                Surface::Visitor(_) => vec![],
            },
            AppEvent::CustomerDetailsFailed { customer_id, reason } => match &mut self.surface {
                Surface::Agent(dashboard) => dashboard.on_details_failed(customer_id, reason),
                Surface::Visitor(_) => vec![],
            },
        }
    }

    fn handle_input(&mut self, input: UserInput) -> Vec<AppAction> {
        match input {
            UserInput::Quit => vec![AppAction::Quit],
            UserInput::Open => lift(self.widget_mut().open()),
            UserInput::Close => lift(self.widget_mut().close()),
            UserInput::Toggle => lift(self.widget_mut().toggle()),
            UserInput::Submit(text) => self.submit(&text),
            UserInput::Select(session_id) => match &mut self.surface {
                Surface::Agent(dashboard) => dashboard.select(session_id),
                Surface::Visitor(_) => self.agent_only("select"),
            },
            UserInput::NewChat(customer_id) => match &mut self.surface {
                Surface::Agent(dashboard) => dashboard.start_new_chat(customer_id),
                Surface::Visitor(_) => self.agent_only("new chat"),
            },
            UserInput::ShowDetails => match &mut self.surface {
                Surface::Agent(dashboard) => dashboard.show_details(),
                Surface::Visitor(_) => self.agent_only("details"),
            },
            UserInput::HideDetails => match &mut self.surface {
                Surface::Agent(dashboard) => dashboard.hide_details(),
                Surface::Visitor(_) => vec![],
            },
        }
    }

    fn submit(&mut self, text: &str) -> Vec<AppAction> {
        let result = match &mut self.surface {
            Surface::Visitor(widget) => widget.send(text).map(lift),
            Surface::Agent(dashboard) => dashboard.submit(text),
        };

        match result {
            Ok(actions) => {
                self.status_message = None;
                actions
            },
            Err(reason) => {
                tracing::debug!(%reason, "send rejected");
                self.status_message = Some(reason.to_string());
                vec![AppAction::Render]
            },
        }
    }

    fn agent_only(&mut self, what: &str) -> Vec<AppAction> {
        self.status_message = Some(format!("{what} is only available to agents"));
        vec![AppAction::Render]
    }

    fn widget_mut(&mut self) -> &mut ChatWidget<E> {
        match &mut self.surface {
            Surface::Visitor(widget) => widget,
            Surface::Agent(dashboard) => dashboard.widget_mut(),
        }
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Local role.
    pub fn role(&self) -> SenderRole {
        self.widget().role()
    }

    /// Configuration the app was started with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Visitor widget or agent dashboard.
    pub fn surface(&self) -> &Surface<E> {
        &self.surface
    }

    /// The conversation widget (the agent's conversation pane).
    pub fn widget(&self) -> &ChatWidget<E> {
        match &self.surface {
            Surface::Visitor(widget) => widget,
            Surface::Agent(dashboard) => dashboard.widget(),
        }
    }

    /// Agent dashboard, if this is an agent client.
    pub fn dashboard(&self) -> Option<&AgentDashboard<E>> {
        match &self.surface {
            Surface::Agent(dashboard) => Some(dashboard),
            Surface::Visitor(_) => None,
        }
    }

    /// Current status message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Last reported terminal size (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }
}

fn visitor_inbound<E: Environment>(
    widget: &mut ChatWidget<E>,
    event: InboundEvent,
) -> Vec<WidgetAction> {
    match event {
        InboundEvent::Connect => widget.on_connection_change(ConnectionState::Connected),
        InboundEvent::Disconnect => widget.on_connection_change(ConnectionState::Disconnected),
        InboundEvent::ReceiveMessage(message) => widget.on_message_received(message),
        InboundEvent::ChatHistory(history) => widget.on_history_received(history.history),
        InboundEvent::NewCustomerSession(session) => {
            tracing::debug!(session = session.id, "agent broadcast ignored by visitor");
            vec![]
        },
    }
}

#[cfg(test)]
mod tests {
    use livechat_client::{SendRejected, notice};
    use livechat_proto::{OutboundEvent, events::RequestHistory};

    use super::*;

    #[derive(Clone)]
    struct FixedClock;

    impl Environment for FixedClock {
        fn time_label(&self) -> String {
            "03:00 PM".into()
        }
    }

    #[test]
    fn visitor_start_only_renders() {
        let mut app = App::new(ClientConfig::default(), FixedClock);

        assert_eq!(app.start(), vec![AppAction::Render]);
        assert!(app.dashboard().is_none());
    }

    #[test]
    fn visitor_open_requests_history_once_connected() {
        let mut app = App::new(ClientConfig::default(), FixedClock);
        let _ = app.handle(AppEvent::Channel(InboundEvent::Connect));

        let actions = app.handle(AppEvent::Input(UserInput::Open));

        assert_eq!(actions, vec![
            AppAction::Emit(OutboundEvent::RequestHistory(RequestHistory { session_id: None })),
            AppAction::Render,
        ]);
    }

    #[test]
    fn rejected_submit_sets_status_and_emits_nothing() {
        let mut app = App::new(ClientConfig::default(), FixedClock);

        let actions = app.handle(AppEvent::Input(UserInput::Submit("hello".into())));

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.status_message(), Some(SendRejected::Disconnected.to_string().as_str()));
        assert!(app.widget().messages().is_empty());
    }

    #[test]
    fn visitor_cannot_select() {
        let mut app = App::new(ClientConfig::default(), FixedClock);

        let actions = app.handle(AppEvent::Input(UserInput::Select(1)));

        assert_eq!(actions, vec![AppAction::Render]);
        assert!(app.status_message().is_some());
    }

    #[test]
    fn channel_failure_shows_notice() {
        let mut app = App::new(ClientConfig::default(), FixedClock);

        let _ = app.handle(AppEvent::ChannelFailed { reason: "refused".into() });

        assert_eq!(app.widget().messages()[0].text, notice::CHANNEL_FAILED);
        assert_eq!(app.status_message(), Some("Error: refused"));
    }

    #[test]
    fn agent_preselected_customer_gets_new_chat() {
        let config = ClientConfig { preselected_customer: Some(42), ..ClientConfig::agent() };
        let mut app = App::new(config, FixedClock);

        let actions = app.start();

        assert!(actions.contains(&AppAction::FetchCustomerDetails { customer_id: 42 }));
        assert_eq!(app.role(), SenderRole::Agent);
        assert_eq!(app.widget().messages()[0].text, notice::AGENT_NEW_CHAT);
    }

    #[test]
    fn resize_records_size_and_renders() {
        let mut app = App::new(ClientConfig::default(), FixedClock);

        assert_eq!(app.handle(AppEvent::Resize(120, 40)), vec![AppAction::Render]);
        assert_eq!(app.terminal_size(), (120, 40));
        assert_eq!(app.handle(AppEvent::Redraw), vec![AppAction::Render]);
    }

    #[test]
    fn quit_is_forwarded() {
        let mut app = App::new(ClientConfig::agent(), FixedClock);

        assert_eq!(app.handle(AppEvent::Input(UserInput::Quit)), vec![AppAction::Quit]);
    }
}
