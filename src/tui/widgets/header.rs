//! Title bar: app name on the left, the running spinner in the middle and
//! the dataset source on the right.

use super::spinner::Spinner;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct Header<'a> {
    source: &'a str,
    spinner: Option<&'a Spinner>,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, spinner: Option<&'a Spinner>) -> Self {
        Self { source, spinner }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bar = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        buf.set_style(area, bar);

        let title = format!(" DB Playground v{}", env!("CARGO_PKG_VERSION"));
        Paragraph::new(Line::from(title)).render(area, buf);

        if let Some(spinner) = self.spinner {
            Paragraph::new(Line::from(Span::styled(
                spinner.display(),
                bar.fg(Color::Yellow),
            )))
            .alignment(Alignment::Center)
            .render(area, buf);
        }

        // The source label gives way on narrow screens.
        let source = format!(" [data: {}] ", self.source);
        if source.chars().count() < usize::from(area.width / 2) {
            Paragraph::new(Line::from(source))
                .alignment(Alignment::Right)
                .render(area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(header: Header, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        header.render(area, &mut buf);
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_header_shows_title_and_source() {
        let line = render(Header::new("embedded", None), 80);
        assert!(line.starts_with(" DB Playground v"));
        assert!(line.ends_with(" [data: embedded] "));
    }

    #[test]
    fn test_header_drops_source_when_narrow() {
        let line = render(Header::new("/a/very/long/data/directory", None), 40);
        assert!(!line.contains("[data:"));
    }

    #[test]
    fn test_header_centers_spinner() {
        let spinner = Spinner::running();
        let line = render(Header::new("embedded", Some(&spinner)), 100);
        assert!(line.contains("Running query"));
    }
}
