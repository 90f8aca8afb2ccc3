//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (buffer, cursor) and handles
//! character-level key events. Command parsing happens here on Enter.

use livechat_app::{AppEvent, UserInput};

use crate::commands;

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Tab key (toggle the chat panel).
    Tab,
    /// Escape key (quit).
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Input state for the TUI.
///
/// Manages the text input buffer and cursor position, counted in
/// characters. Also holds the last command error, shown in the status bar
/// until the next line is entered.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position within the buffer, in characters.
    cursor: usize,
    /// Last command parse error.
    hint: Option<String>,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Last command error, if any.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Handle a key input event.
    ///
    /// Editing keys return [`AppEvent::Redraw`]; Enter returns the user
    /// intent the line stands for.
    pub fn handle_key(&mut self, key: KeyInput) -> Option<AppEvent> {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.len() {
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => self.cursor = self.cursor.saturating_add(1).min(self.len()),
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.len(),
            KeyInput::Enter => return self.handle_enter(),
            KeyInput::Tab => return Some(AppEvent::Input(UserInput::Toggle)),
            KeyInput::Esc => return Some(AppEvent::Input(UserInput::Quit)),
        }
        Some(AppEvent::Redraw)
    }

    /// Handle Enter key - parse the line into a user intent.
    fn handle_enter(&mut self) -> Option<AppEvent> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;
        self.hint = None;

        if text.is_empty() {
            return None;
        }

        match commands::parse(&text) {
            Ok(command) => Some(AppEvent::Input(command.into())),
            Err(e) => {
                tracing::debug!(error = %e, "invalid command");
                self.hint = Some(e.to_string());
                Some(AppEvent::Redraw)
            },
        }
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}
