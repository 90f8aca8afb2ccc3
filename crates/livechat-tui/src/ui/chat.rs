//! Chat area
//!
//! Displays the conversation transcript, or a hint while the panel is closed.

use livechat_app::AgentDashboard;
use livechat_client::{ChatWidget, Environment, SenderRole, SessionBinding};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render<E: Environment>(frame: &mut Frame, widget: &ChatWidget<E>, title: &str, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());

    let items: Vec<ListItem> = if widget.is_open() {
        widget
            .messages()
            .iter()
            .map(|msg| {
                let style = match msg.role {
                    SenderRole::System => {
                        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
                    },
                    role if role == widget.role() => Style::default().fg(Color::Green),
                    _ => Style::default().fg(Color::Cyan),
                };

                ListItem::new(Line::from(vec![
                    Span::styled(format!("[{}] ", msg.sent_at), Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format!("{}:", msg.role),
                        style.add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::styled(msg.text.clone(), style),
                ]))
            })
            .collect()
    } else {
        closed_hint(widget.unread())
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

fn closed_hint(unread: usize) -> Vec<ListItem<'static>> {
    let mut lines = vec![ListItem::new(Line::from(Span::styled(
        "Chat is closed. Type /open or press Tab to open it.",
        Style::default().fg(Color::DarkGray),
    )))];
    if unread > 0 {
        lines.push(ListItem::new(Line::from(Span::styled(
            format!("{unread} unread"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))));
    }
    lines
}

/// Title of the agent's conversation pane.
pub fn agent_title<E: Environment>(dashboard: &AgentDashboard<E>) -> String {
    let widget = dashboard.widget();
    match widget.session() {
        SessionBinding::Active(session_id) => {
            let name = dashboard
                .conversation(session_id)
                .map_or_else(|| format!("Session {session_id}"), |c| c.customer_name.clone());
            format!(" {name} (#{session_id}) ")
        },
        SessionBinding::Pending => match widget.customer_id() {
            Some(customer_id) => format!(" New chat with customer {customer_id} "),
            None => " No conversation selected ".to_string(),
        },
    }
}
