//! Toast notification widget for the TUI.
//!
//! Displays temporary messages that auto-dismiss.

use crate::notify::{Notification, NotificationLevel};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Toast notification widget.
pub struct Toast<'a> {
    notification: &'a Notification,
}

impl<'a> Toast<'a> {
    /// Creates a new toast widget.
    pub fn new(notification: &'a Notification) -> Self {
        Self { notification }
    }

    /// Calculates the area for the toast (bottom-right corner).
    pub fn area(screen: Rect) -> Rect {
        let width = 44.min(screen.width.saturating_sub(4));
        let height = 4.min(screen.height);
        let x = screen.width.saturating_sub(width + 2);
        let y = screen.height.saturating_sub(height + 1);
        Rect::new(x, y, width, height)
    }

    fn color(&self) -> Color {
        match self.notification.level {
            NotificationLevel::Success => Color::Green,
            NotificationLevel::Error => Color::Red,
            NotificationLevel::Info => Color::Cyan,
        }
    }
}

impl Widget for Toast<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let color = self.color();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(
                format!(" {} ", self.notification.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(Color::Black));

        let line = Line::from(Span::styled(
            self.notification.description.as_str(),
            Style::default().fg(Color::White),
        ));

        Paragraph::new(line)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
