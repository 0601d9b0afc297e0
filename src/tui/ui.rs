//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::{App, Focus};
use super::widgets::{editor, header, help, table, templates, toast};
use crate::state::ExecutionState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // Header
            Constraint::Percentage(30), // Editor
            Constraint::Length(1),      // Run button and status
            Constraint::Length(3),      // Search
            Constraint::Min(5),         // Results
            Constraint::Length(1),      // Shortcuts
        ])
        .split(area);

    render_header(frame, main_layout[0], app);
    render_editor(frame, main_layout[1], app);
    render_status(frame, main_layout[2], app);
    render_search(frame, main_layout[3], app);
    render_results(frame, main_layout[4], app);
    frame.render_widget(help::ShortcutBar, main_layout[5]);

    if let Some(picker) = &app.picker {
        let picker_area = templates::TemplatePickerWidget::area(area);
        frame.render_widget(
            templates::TemplatePickerWidget::new(picker.selected),
            picker_area,
        );
    }

    if let Some(current) = &app.toast {
        frame.render_widget(
            toast::Toast::new(&current.notification),
            toast::Toast::area(area),
        );
    }
}

/// Renders the header bar.
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let widget = header::Header::new(&app.source, app.spinner.as_ref());
    frame.render_widget(widget, area);
}

/// Screen coordinate `cells` past the border at `origin`, saturating at the
/// edge of the coordinate space.
fn inside_border(origin: u16, cells: usize) -> u16 {
    origin
        .saturating_add(1)
        .saturating_add(u16::try_from(cells).unwrap_or(u16::MAX))
}

/// Renders the query editor and places the cursor when it has focus.
fn render_editor(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Editor && app.picker.is_none();
    let (line, column) = app.editor.cursor_position();
    let widget = editor::QueryEditor::new(app.editor.text(), line, focused);
    frame.render_widget(widget, area);

    if focused {
        let visible = area.height.saturating_sub(2) as usize;
        let offset = editor::calculate_scroll_offset(line, visible);
        let cursor_x = inside_border(area.x, column);
        let cursor_y = inside_border(area.y, line - offset);
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), cursor_y));
    }
}

/// Builds the status line text for the current execution state.
pub fn status_line(state: &ExecutionState) -> Line<'static> {
    match state {
        ExecutionState::Idle => Line::from(Span::styled(
            "Ready",
            Style::default().fg(Color::DarkGray),
        )),
        ExecutionState::Running { .. } => Line::from(Span::styled(
            "Running...",
            Style::default().fg(Color::Yellow),
        )),
        ExecutionState::Succeeded { result } => Line::from(Span::styled(
            format!(
                "{} rows in {} ms",
                result.row_count(),
                result.execution_time().as_millis()
            ),
            Style::default().fg(Color::Green),
        )),
        ExecutionState::Failed { message, .. } => Line::from(Span::styled(
            format!("Error: {message}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    }
}

/// Renders the run button followed by the execution status.
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let running = app.execution.is_running();
    let button_style = if app.focus == Focus::RunButton {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if running {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };
    let label = if running { " Running " } else { " Run Query " };

    let mut spans = vec![
        Span::styled(format!("[{label}]"), button_style),
        Span::raw("  "),
    ];
    spans.extend(status_line(&app.execution).spans);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders the search box.
fn render_search(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Search && app.picker.is_none();
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search ");

    let term = app.results.search();
    let content = if term.is_empty() {
        Span::styled("Search results...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(term.to_string())
    };
    frame.render_widget(Paragraph::new(Line::from(content)).block(block), area);

    if focused {
        let cursor_x = inside_border(area.x, term.chars().count());
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Renders the filtered result rows.
fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let headers = app.results.headers(&app.execution);
    let rows = app.results.filtered(&app.execution);
    let total = app
        .execution
        .visible_result()
        .map_or(0, |result| result.row_count());

    let footer = if app.results.search().is_empty() {
        format!("{total} rows")
    } else {
        format!("Showing {} of {} rows", rows.len(), total)
    };

    let widget = table::ResultTable::new(&headers, &rows)
        .scroll(app.table_scroll)
        .footer(footer);
    frame.render_widget(widget, area);
}
