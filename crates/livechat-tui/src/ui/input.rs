//! Input line
//!
//! Displays the input buffer with cursor.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::InputState;

const PROMPT_WIDTH: u16 = 3; // "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the input line.
pub fn render(frame: &mut Frame, input: &InputState, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    let input_text = format!("> {}", input.buffer());
    let paragraph =
        Paragraph::new(input_text).style(Style::default().fg(Color::White)).block(block);

    frame.render_widget(paragraph, area);

    let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
    let cursor_offset = cursor_offset(input.cursor(), available_width);

    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);

    frame.set_cursor_position((cursor_x.min(max_x), cursor_y));
}

/// Cursor column within the input line, clamped to the visible width.
fn cursor_offset(cursor: usize, available_width: u16) -> u16 {
    u16::try_from(cursor).unwrap_or(u16::MAX).min(available_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_draft_keeps_cursor_at_edge() {
        assert_eq!(cursor_offset(3, 40), 3);
        assert_eq!(cursor_offset(70_000, 40), 40);
        assert_eq!(cursor_offset(usize::from(u16::MAX) + 5, 40), 40);
    }
}
