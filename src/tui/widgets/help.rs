//! Shortcut bar for the TUI.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Key bindings shown in the footer, in display order.
const SHORTCUTS: &[(&str, &str)] = &[
    ("Ctrl+Enter/F5", "Run"),
    ("Ctrl+/", "Comment"),
    ("Alt+F", "Format"),
    ("Ctrl+T", "Templates"),
    ("Ctrl+E", "Export"),
    ("Tab", "Focus"),
    ("Ctrl+Q", "Quit"),
];

/// One-line shortcut reference.
pub struct ShortcutBar;

impl ShortcutBar {
    fn line() -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(Color::Gray);

        let mut spans = Vec::new();
        for (i, (key, desc)) in SHORTCUTS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*key, key_style));
            spans.push(Span::styled(format!(" {desc}"), desc_style));
        }
        Line::from(spans)
    }
}

impl Widget for ShortcutBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Self::line()).render(area, buf);
    }
}
