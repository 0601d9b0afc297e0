//! Template picker overlay for the TUI.
//!
//! Lists the built-in templates grouped by category, with the highlighted
//! template's description at the bottom.

use crate::templates::TEMPLATES;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Template picker widget.
pub struct TemplatePickerWidget {
    selected: usize,
}

impl TemplatePickerWidget {
    /// Creates a picker with the given template highlighted.
    pub fn new(selected: usize) -> Self {
        Self { selected }
    }

    /// Calculates the centered area for the picker.
    pub fn area(parent: Rect) -> Rect {
        let width = 56.min(parent.width.saturating_sub(4));
        let height = 24.min(parent.height.saturating_sub(2));
        let x = parent.x + (parent.width.saturating_sub(width)) / 2;
        let y = parent.y + (parent.height.saturating_sub(height)) / 2;
        Rect::new(x, y, width, height)
    }

    fn content(&self) -> Vec<Line<'static>> {
        let section_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let selected_style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let mut lines = Vec::new();
        let mut category = "";

        for (i, template) in TEMPLATES.iter().enumerate() {
            if template.category != category {
                category = template.category;
                lines.push(Line::from(Span::styled(category, section_style)));
            }
            let style = if i == self.selected {
                selected_style
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(template.name, style),
            ]));
        }

        if let Some(template) = TEMPLATES.get(self.selected) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                template.description,
                Style::default().fg(Color::Gray),
            )));
        }

        lines
    }
}

impl Widget for TemplatePickerWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Query Templates (Enter to load, Esc to close) ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );

        Paragraph::new(self.content()).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::categories;

    #[test]
    fn test_picker_lists_every_template_under_its_category() {
        let lines = TemplatePickerWidget::new(0).content();
        // categories + templates + blank + description
        assert_eq!(lines.len(), categories().len() + TEMPLATES.len() + 2);
    }

    #[test]
    fn test_picker_area_is_centered() {
        let parent = Rect::new(0, 0, 100, 40);
        let area = TemplatePickerWidget::area(parent);
        assert_eq!(area.width, 56);
        assert_eq!(area.x, 22);
    }
}
