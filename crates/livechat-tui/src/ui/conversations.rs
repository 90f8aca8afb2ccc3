//! Conversations sidebar
//!
//! Displays the agent's conversation list with unread indicators and the
//! last message preview.

use livechat_app::AgentDashboard;
use livechat_client::Environment;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const ACTIVE_PREFIX: &str = ">";
const INACTIVE_PREFIX: &str = " ";
const UNREAD_MARKER: &str = " *";
const PREVIEW_CHARS: usize = 22;

/// Render the conversations sidebar.
pub fn render<E: Environment>(frame: &mut Frame, dashboard: &AgentDashboard<E>, area: Rect) {
    let items: Vec<ListItem> = dashboard
        .conversations()
        .iter()
        .map(|conversation| {
            let active = dashboard.active() == Some(conversation.session_id);
            let (prefix, style) = if active {
                (ACTIVE_PREFIX, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else if conversation.unread {
                (INACTIVE_PREFIX, Style::default().fg(Color::Cyan))
            } else {
                (INACTIVE_PREFIX, Style::default())
            };
            let marker = if conversation.unread { UNREAD_MARKER } else { "" };

            let title = Line::from(vec![
                Span::raw(prefix),
                Span::styled(
                    format!("#{} {}", conversation.session_id, conversation.customer_name),
                    style,
                ),
                Span::styled(marker, Style::default().fg(Color::Red)),
            ]);
            let preview = conversation.preview.as_deref().map_or_else(String::new, |text| {
                text.chars().take(PREVIEW_CHARS).collect::<String>()
            });
            let preview = Line::from(Span::styled(
                format!("  {preview}"),
                Style::default().fg(Color::DarkGray),
            ));

            ListItem::new(vec![title, preview])
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title(" Conversations ");
    frame.render_widget(List::new(items).block(block), area);
}
