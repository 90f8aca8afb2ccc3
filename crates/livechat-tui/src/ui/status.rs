//! Status bar
//!
//! Displays connection status, the bound conversation and the latest status
//! or command error.

use livechat_app::App;
use livechat_client::{ConnectionState, Environment};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::InputState;

/// Render the status bar.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, input: &InputState, area: Rect) {
    let connection_status = match app.widget().connection() {
        ConnectionState::Disconnected => {
            Span::styled("Disconnected", Style::default().fg(Color::Red))
        },
        ConnectionState::Connected => Span::styled(
            "Connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let status_line = Line::from(vec![
        Span::raw(" "),
        connection_status,
        Span::styled(details_text(app, input), Style::default().fg(Color::White)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}

/// Full status line as plain text.
pub fn status_text<E: Environment>(app: &App<E>, input: &InputState) -> String {
    let connection = match app.widget().connection() {
        ConnectionState::Disconnected => "Disconnected",
        ConnectionState::Connected => "Connected",
    };
    format!("{connection}{}", details_text(app, input))
}

fn details_text<E: Environment>(app: &App<E>, input: &InputState) -> String {
    let widget = app.widget();
    let mut text = format!(" | {}", app.role());

    if let Some(session_id) = widget.session().session_id() {
        text.push_str(&format!(" | Session #{session_id}"));
    }
    if widget.unread() > 0 {
        text.push_str(&format!(" | {} unread", widget.unread()));
    }
    if let Some(message) = input.hint().or(app.status_message()) {
        text.push_str(&format!(" | {message}"));
    }
    text
}
