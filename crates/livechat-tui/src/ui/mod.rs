//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod chat;
mod conversations;
mod details;
mod input;
mod status;

use livechat_app::{App, DetailsPanel, Surface};
use livechat_client::Environment;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

pub use status::status_text;

use crate::InputState;

/// Render the entire UI.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, input: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    match app.surface() {
        Surface::Visitor(widget) => chat::render(frame, widget, " Support Chat ", *main_area),
        Surface::Agent(_) => render_dashboard(frame, app, *main_area),
    }
    input::render(frame, input, *input_area);
    status::render(frame, app, input, *status_area);
}

/// Render the agent dashboard (conversation list + chat + details).
fn render_dashboard<E: Environment>(frame: &mut Frame, app: &App<E>, area: Rect) {
    const SIDEBAR_WIDTH: u16 = 28;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;
    const DETAILS_WIDTH: u16 = 34;

    let Some(dashboard) = app.dashboard() else {
        return;
    };

    let details_width =
        if matches!(dashboard.details(), DetailsPanel::Hidden) { 0 } else { DETAILS_WIDTH };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SIDEBAR_WIDTH),
            Constraint::Min(CHAT_AREA_MIN_WIDTH),
            Constraint::Length(details_width),
        ])
        .split(area);

    let [list_area, chat_area, details_area] = chunks.as_ref() else {
        return;
    };

    conversations::render(frame, dashboard, *list_area);
    chat::render(frame, dashboard.widget(), &chat::agent_title(dashboard), *chat_area);
    if details_width > 0 {
        details::render(frame, dashboard.details(), *details_area);
    }
}
