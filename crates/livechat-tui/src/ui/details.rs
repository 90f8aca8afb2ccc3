//! Customer details panel

use livechat_app::DetailsPanel;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the customer details panel.
pub fn render(frame: &mut Frame, details: &DetailsPanel, area: Rect) {
    let lines: Vec<Line> = match details {
        DetailsPanel::Hidden => vec![],
        DetailsPanel::Loading { .. } => vec![Line::from(Span::styled(
            "Loading customer details...",
            Style::default().fg(Color::DarkGray),
        ))],
        DetailsPanel::Loaded { details, .. } => details
            .rows()
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label}: "), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(value.to_string()),
                ])
            })
            .collect(),
        DetailsPanel::Failed { reason, .. } => vec![Line::from(Span::styled(
            format!("Failed to load details: {reason}"),
            Style::default().fg(Color::Red),
        ))],
    };

    let title = details
        .customer_id()
        .map_or_else(|| " Customer ".to_string(), |id| format!(" Customer {id} "));
    let block = Block::default().borders(Borders::ALL).title(title);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
