//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The chat channel is a
//! WebSocket and customer details come from the HTTP API.

use std::{
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use livechat_app::{App, AppEvent, ClientConfig, Driver, UserInput};
use livechat_client::{
    CustomerId, Environment, SenderRole,
    directory::HttpDirectory,
    transport::{self, ConnectedChannel, Inbound, TransportError},
};
use livechat_proto::OutboundEvent;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{InputState, KeyInput, ui};

const TICK: Duration = Duration::from_millis(250);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// What woke the driver up.
enum Wake {
    Terminal(Option<io::Result<Event>>),
    Channel(Option<Inbound>),
    Details(Option<AppEvent>),
    Tick,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), the chat channel
/// (WebSocket) and customer detail fetches (HTTP). Owns the input state for
/// text editing.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    input_state: InputState,
    role: SenderRole,
    server_url: String,
    connection: Option<ConnectedChannel>,
    directory: HttpDirectory,
    details_tx: mpsc::Sender<AppEvent>,
    details_rx: mpsc::Receiver<AppEvent>,
}

impl TerminalDriver {
    /// Create a new terminal driver and take over the terminal.
    pub fn new(config: &ClientConfig) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let (details_tx, details_rx) = mpsc::channel(16);

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            input_state: InputState::new(),
            role: config.role,
            server_url: config.server_url.clone(),
            connection: None,
            directory: HttpDirectory::new(config.api_base.clone()),
            details_tx,
            details_rx,
        })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    fn terminal_event(&mut self, event: Event) -> Option<AppEvent> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Self::convert_key(key.code).and_then(|key| self.input_state.handle_key(key))
            },
            Event::Resize(cols, rows) => Some(AppEvent::Resize(cols, rows)),
            _ => None,
        }
    }
}

/// Next frame from the channel, or never when there is no channel.
async fn next_inbound(connection: &mut Option<ConnectedChannel>) -> Option<Inbound> {
    match connection {
        Some(channel) => channel.from_server.recv().await,
        None => std::future::pending().await,
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        let wake = tokio::select! {
            biased;

            event = self.event_stream.next() => Wake::Terminal(event),
            inbound = next_inbound(&mut self.connection) => Wake::Channel(inbound),
            details = self.details_rx.recv() => Wake::Details(details),
            () = tokio::time::sleep(TICK) => Wake::Tick,
        };

        match wake {
            Wake::Terminal(Some(Ok(event))) => Ok(self.terminal_event(event)),
            Wake::Terminal(Some(Err(e))) => Err(TerminalError::Io(e)),
            Wake::Terminal(None) => Ok(Some(AppEvent::Input(UserInput::Quit))),
            Wake::Channel(Some(inbound)) => Ok(AppEvent::from_channel(inbound)),
            Wake::Channel(None) => {
                tracing::debug!("chat channel task finished");
                self.connection = None;
                Ok(None)
            },
            Wake::Details(event) => Ok(event),
            Wake::Tick => Ok(Some(AppEvent::Tick)),
        }
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        let channel = transport::connect(&self.server_url, self.role).await?;
        self.connection = Some(channel);
        Ok(())
    }

    async fn emit(&mut self, event: OutboundEvent) -> Result<(), Self::Error> {
        let Some(channel) = &self.connection else {
            tracing::debug!(?event, "no chat channel; event dropped");
            return Ok(());
        };
        if channel.to_server.send(event).await.is_err() {
            tracing::warn!("chat channel closed; event dropped");
        }
        Ok(())
    }

    async fn request_customer_details(&mut self, customer_id: CustomerId) -> Result<(), Self::Error> {
        let directory = self.directory.clone();
        let tx = self.details_tx.clone();

        tokio::spawn(async move {
            let event = match directory.fetch(customer_id).await {
                Ok(details) => AppEvent::CustomerDetailsLoaded { customer_id, details },
                Err(e) => {
                    tracing::warn!(customer_id, error = %e, "customer details unavailable");
                    AppEvent::CustomerDetailsFailed { customer_id, reason: e.to_string() }
                },
            };
            let _ = tx.send(event).await;
        });
        Ok(())
    }

    fn render<E: Environment>(&mut self, app: &App<E>) -> Result<(), Self::Error> {
        let input_state = &self.input_state;
        self.terminal.draw(|frame| {
            ui::render(frame, app, input_state);
        })?;
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(channel) = self.connection.take() {
            channel.stop();
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
