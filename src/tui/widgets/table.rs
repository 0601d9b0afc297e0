//! Result grid.
//!
//! Rows are drawn under humanized headers inside box-drawing borders.
//! Columns size to their content between a floor and a cap, then the widest
//! ones give up space until the grid fits the screen. NULL shows as a dim
//! `N/A`.

use crate::dataset::Row;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

const MAX_COLUMN_WIDTH: usize = 40;
const MIN_COLUMN_WIDTH: usize = 4;

/// Lines around the body: top border, header, separator, bottom border
/// and footer.
const CHROME_LINES: usize = 5;

fn border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub struct ResultTable<'a> {
    headers: &'a [String],
    rows: &'a [&'a Row],
    scroll: usize,
    footer: Option<String>,
}

impl<'a> ResultTable<'a> {
    pub fn new(headers: &'a [String], rows: &'a [&'a Row]) -> Self {
        Self {
            headers,
            rows,
            scroll: 0,
            footer: None,
        }
    }

    /// Index of the first row drawn.
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Dim line drawn under the grid.
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Natural width of every column, clamped to the floor and cap.
    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|value| value.to_display_string().chars().count())
                    .fold(header.chars().count(), usize::max)
                    .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    /// Lays the grid out for `width` columns and `height` lines of screen.
    pub fn render_to_lines(&self, width: usize, height: usize) -> Vec<Line<'a>> {
        if self.headers.is_empty() {
            return vec![Line::from(Span::styled("(no results)", border_style()))];
        }

        let widths = fit_widths(self.column_widths(), width);
        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            border(&widths, '┌', '┬', '┐'),
            grid_row(
                &widths,
                self.headers.iter().map(|h| (h.clone(), header_style)),
            ),
            border(&widths, '├', '┼', '┤'),
        ];

        let body = height.saturating_sub(CHROME_LINES).max(1);
        let first = self.scroll.min(self.rows.len());
        lines.extend(self.rows[first..].iter().take(body).map(|row| {
            grid_row(
                &widths,
                row.iter().map(|value| {
                    let style = if value.is_null() {
                        border_style().add_modifier(Modifier::ITALIC)
                    } else {
                        Style::default()
                    };
                    (value.to_display_string(), style)
                }),
            )
        }));

        lines.push(border(&widths, '└', '┴', '┘'));
        if let Some(footer) = &self.footer {
            lines.push(Line::from(Span::styled(footer.clone(), border_style())));
        }
        lines
    }
}

/// Shrinks the widest columns one cell at a time until the grid, with its
/// three cells of border and padding per column, fits in `available`.
fn fit_widths(mut widths: Vec<usize>, available: usize) -> Vec<usize> {
    let total = |widths: &[usize]| widths.iter().map(|w| w + 3).sum::<usize>() + 1;

    while total(&widths) > available {
        let Some(widest) = widths
            .iter_mut()
            .filter(|w| **w > MIN_COLUMN_WIDTH)
            .max_by_key(|w| **w)
        else {
            break;
        };
        *widest -= 1;
    }
    widths
}

/// Cuts `text` to `width` characters, ending in `...` when there is room.
fn truncate(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let kept: String = text.chars().take(width - 3).collect();
    kept + "..."
}

fn border(widths: &[usize], left: char, joint: char, right: char) -> Line<'static> {
    let inner = widths
        .iter()
        .map(|w| "─".repeat(w + 2))
        .collect::<Vec<_>>()
        .join(&joint.to_string());
    Line::from(Span::styled(format!("{left}{inner}{right}"), border_style()))
}

fn grid_row<I>(widths: &[usize], cells: I) -> Line<'static>
where
    I: Iterator<Item = (String, Style)>,
{
    let mut spans = vec![Span::styled("│", border_style())];
    for ((text, style), &width) in cells.zip(widths) {
        spans.push(Span::styled(
            format!(" {:width$} ", truncate(&text, width)),
            style,
        ));
        spans.push(Span::styled("│", border_style()));
    }
    Line::from(spans)
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.render_to_lines(usize::from(area.width), usize::from(area.height));
        for (line, y) in lines.iter().zip(area.top()..area.bottom()) {
            buf.set_line(area.x, y, line, area.width);
        }
    }
}
