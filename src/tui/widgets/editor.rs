//! Query editor widget for the TUI.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Returns the first visible line so that `cursor_line` stays on screen.
pub fn calculate_scroll_offset(cursor_line: usize, visible_lines: usize) -> usize {
    if visible_lines == 0 || cursor_line < visible_lines {
        0
    } else {
        cursor_line + 1 - visible_lines
    }
}

/// Multi-line query editor widget.
pub struct QueryEditor<'a> {
    text: &'a str,
    cursor_line: usize,
    focused: bool,
}

impl<'a> QueryEditor<'a> {
    /// Creates a new editor widget.
    pub fn new(text: &'a str, cursor_line: usize, focused: bool) -> Self {
        Self {
            text,
            cursor_line,
            focused,
        }
    }

    fn line_style(line: &str) -> Style {
        if line.trim_start().starts_with("--") {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC)
        } else {
            Style::default()
        }
    }
}

impl Widget for QueryEditor<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Query ");

        let visible = area.height.saturating_sub(2) as usize;
        let offset = calculate_scroll_offset(self.cursor_line, visible);

        let lines: Vec<Line> = if self.text.is_empty() && !self.focused {
            vec![Line::from(Span::styled(
                "Write a query, e.g. SELECT * FROM products;",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.text
                .split('\n')
                .skip(offset)
                .map(|line| Line::from(Span::styled(line, Self::line_style(line))))
                .collect()
        };

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
