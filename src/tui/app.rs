//! Application state for the TUI.
//!
//! Contains the `App` struct and the editor state. `App` is runtime-free: key
//! handling returns the [`Trigger`] to fire, and the caller (interactive loop
//! or headless runner) hands it to the trigger coordinator.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::notify::Notification;
use crate::query::{format_sql, toggle_comment, QueryBuffer};
use crate::results::ResultsView;
use crate::state::ExecutionState;
use crate::templates::{self, Template, TEMPLATES};
use crate::trigger::{action_for, KeyAction, Trigger};

use super::widgets::spinner::Spinner;

/// Which control currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    RunButton,
    Search,
}

impl Focus {
    /// Cycles to the next control.
    pub fn next(self) -> Self {
        match self {
            Self::Editor => Self::RunButton,
            Self::RunButton => Self::Search,
            Self::Search => Self::Editor,
        }
    }

    /// Returns the focus as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editor => "editor",
            Self::RunButton => "run",
            Self::Search => "search",
        }
    }
}

/// Multi-line text editing state for the query editor.
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Default, Clone)]
pub struct EditorState {
    text: String,
    cursor: usize,
}

impl EditorState {
    /// Creates an editor holding `text` with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    /// Returns the text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the cursor byte offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the text and moves the cursor to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    /// Inserts a character at the cursor.
    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Inserts a string at the cursor.
    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Deletes the character before the cursor.
    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.text.remove(prev);
            self.cursor = prev;
        }
    }

    /// Deletes the character at the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    /// Moves the cursor one character left.
    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    /// Moves the cursor one character right.
    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Moves the cursor to the start of the current line.
    pub fn move_home(&mut self) {
        self.cursor = self.line_start(self.cursor);
    }

    /// Moves the cursor to the end of the current line.
    pub fn move_end(&mut self) {
        self.cursor = self.line_end(self.cursor);
    }

    /// Moves the cursor to the same column on the previous line.
    pub fn move_up(&mut self) {
        let start = self.line_start(self.cursor);
        if start == 0 {
            self.cursor = 0;
            return;
        }
        let column = self.text[start..self.cursor].chars().count();
        let prev_start = self.line_start(start - 1);
        self.cursor = self.offset_at_column(prev_start, column);
    }

    /// Moves the cursor to the same column on the next line.
    pub fn move_down(&mut self) {
        let end = self.line_end(self.cursor);
        if end == self.text.len() {
            self.cursor = end;
            return;
        }
        let column = self.text[self.line_start(self.cursor)..self.cursor]
            .chars()
            .count();
        self.cursor = self.offset_at_column(end + 1, column);
    }

    /// Returns the cursor as (line, column) in characters.
    pub fn cursor_position(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let line = before.matches('\n').count();
        let column = before[self.line_start(self.cursor)..].chars().count();
        (line, column)
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn line_start(&self, offset: usize) -> usize {
        self.text[..offset].rfind('\n').map_or(0, |i| i + 1)
    }

    fn line_end(&self, offset: usize) -> usize {
        self.text[offset..]
            .find('\n')
            .map_or(self.text.len(), |i| offset + i)
    }

    fn offset_at_column(&self, line_start: usize, column: usize) -> usize {
        let line_end = self.line_end(line_start);
        self.text[line_start..line_end]
            .char_indices()
            .nth(column)
            .map_or(line_end, |(i, _)| line_start + i)
    }
}

/// The template picker overlay.
#[derive(Debug, Default, Clone)]
pub struct TemplatePicker {
    /// Index into [`TEMPLATES`].
    pub selected: usize,
}

impl TemplatePicker {
    fn move_up(&mut self) {
        self.selected = self.selected.checked_sub(1).unwrap_or(TEMPLATES.len() - 1);
    }

    fn move_down(&mut self) {
        self.selected = (self.selected + 1) % TEMPLATES.len();
    }

    /// Returns the highlighted template.
    pub fn current(&self) -> &'static Template {
        &TEMPLATES[self.selected % TEMPLATES.len()]
    }
}

/// A toast currently on screen.
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Current focus.
    pub focus: Focus,
    /// Query editor state.
    pub editor: EditorState,
    /// Search term and export.
    pub results: ResultsView,
    /// Latest execution state snapshot.
    pub execution: ExecutionState,
    /// Template picker, when open.
    pub picker: Option<TemplatePicker>,
    /// Toast currently shown.
    pub toast: Option<Toast>,
    /// First visible result row.
    pub table_scroll: usize,
    /// Spinner shown while a query is in flight.
    pub spinner: Option<Spinner>,
    /// Where the datasets came from, for the header.
    pub source: String,
    query: Arc<QueryBuffer>,
    export_dir: PathBuf,
}

impl App {
    /// Creates a new App editing the given shared query text.
    pub fn new(query: Arc<QueryBuffer>, export_dir: PathBuf, source: impl Into<String>) -> Self {
        let editor = EditorState::new(query.text());
        Self {
            running: true,
            focus: Focus::default(),
            editor,
            results: ResultsView::new(),
            execution: ExecutionState::Idle,
            picker: None,
            toast: None,
            table_scroll: 0,
            spinner: None,
            source: source.into(),
            query,
            export_dir,
        }
    }

    /// Replaces the execution snapshot.
    pub fn sync_state(&mut self, state: ExecutionState) {
        let rows = self.results.filtered(&state).len();
        self.table_scroll = self.table_scroll.min(rows.saturating_sub(1));
        if !state.is_running() {
            self.spinner = None;
        } else if self.spinner.is_none() {
            self.spinner = Some(Spinner::running());
        }
        self.execution = state;
    }

    /// Shows a notification as the current toast.
    pub fn show(&mut self, notification: Notification) {
        self.toast = Some(Toast {
            notification,
            shown_at: Instant::now(),
        });
    }

    /// Clears the toast once its duration has passed.
    pub fn clear_expired_toast(&mut self) {
        if let Some(toast) = &self.toast {
            if toast.shown_at.elapsed() >= toast.notification.duration {
                self.toast = None;
            }
        }
    }

    /// Handles a key press. Returns the execution to start, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Trigger> {
        if self.picker.is_some() {
            self.handle_picker_key(key);
            return None;
        }

        if let Some(action) = action_for(&key) {
            return self.perform(action);
        }

        match self.focus {
            Focus::Editor => self.handle_editor_key(key),
            Focus::RunButton => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    return Some(Trigger::RunButton);
                }
            }
            Focus::Search => self.handle_search_key(key),
        }

        None
    }

    /// Runs a global shortcut action.
    pub fn perform(&mut self, action: KeyAction) -> Option<Trigger> {
        match action {
            KeyAction::RunQuery => {
                return Some(if self.focus == Focus::Editor {
                    Trigger::EditorCommand(self.editor.text().to_string())
                } else {
                    Trigger::Accelerator
                });
            }
            KeyAction::ToggleComment => {
                let text = toggle_comment(self.editor.text());
                self.replace_query(text);
            }
            KeyAction::FormatQuery => {
                let text = format_sql(self.editor.text());
                self.replace_query(text);
            }
            KeyAction::SaveQuery => {
                self.show(Notification::info("Query Saved", "Current query saved"));
            }
            KeyAction::Undo => {
                self.show(Notification::info("Undo", "Undo functionality not implemented"));
            }
            KeyAction::Redo => {
                self.show(Notification::info("Redo", "Redo functionality not implemented"));
            }
            KeyAction::Export => self.export(),
            KeyAction::Templates => self.picker = Some(TemplatePicker::default()),
            KeyAction::NextFocus => self.focus = self.focus.next(),
            KeyAction::Quit => self.running = false,
        }
        None
    }

    /// Loads a template by name into the editor. Returns false if unknown.
    pub fn apply_template(&mut self, name: &str) -> bool {
        match templates::find(name) {
            Some(template) => {
                self.replace_query(template.sql.to_string());
                true
            }
            None => false,
        }
    }

    /// Replaces the search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.results.set_search(term);
        self.table_scroll = 0;
    }

    /// Exports the filtered rows and reports the outcome as a toast.
    pub fn export(&mut self) {
        match self
            .results
            .export(&self.execution, &self.export_dir, Utc::now())
        {
            Ok(path) => self.show(Notification::info(
                "Export Complete",
                format!("Saved {}", path.display()),
            )),
            Err(e) => {
                warn!("{}", e);
                self.show(Notification::error("Export Failed", e.to_string()));
            }
        }
    }

    /// Types text into the focused control.
    pub fn type_text(&mut self, text: &str) {
        match self.focus {
            Focus::Search => {
                self.results.search_mut().push_str(text);
                self.table_scroll = 0;
            }
            _ => {
                self.focus = Focus::Editor;
                self.editor.insert_str(text);
                self.publish_query();
            }
        }
    }

    fn replace_query(&mut self, text: String) {
        self.editor.set_text(text);
        self.publish_query();
    }

    fn publish_query(&self) {
        self.query.replace(self.editor.text());
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let before = self.editor.text().len();
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.editor.insert(c)
            }
            KeyCode::Enter => self.editor.insert('\n'),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.move_home(),
            KeyCode::End => self.editor.move_end(),
            _ => return,
        }
        if self.editor.text().len() != before {
            self.publish_query();
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.results.search_mut().push(c);
                self.table_scroll = 0;
            }
            KeyCode::Backspace => {
                self.results.search_mut().pop();
                self.table_scroll = 0;
            }
            KeyCode::Esc => self.set_search(""),
            KeyCode::Up => self.table_scroll = self.table_scroll.saturating_sub(1),
            KeyCode::Down => self.scroll_table(1),
            KeyCode::PageUp => self.table_scroll = self.table_scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll_table(10),
            _ => {}
        }
    }

    fn scroll_table(&mut self, by: usize) {
        let rows = self.results.filtered(&self.execution).len();
        self.table_scroll = (self.table_scroll + by).min(rows.saturating_sub(1));
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Up => picker.move_up(),
            KeyCode::Down => picker.move_down(),
            KeyCode::Enter => {
                let template = picker.current();
                self.picker = None;
                self.replace_query(template.sql.to_string());
                self.focus = Focus::Editor;
            }
            KeyCode::Esc => self.picker = None,
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.running = false
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, ResultSet, TableName, Value};
    use crate::notify::NotificationLevel;

    fn app() -> App {
        App::new(
            Arc::new(QueryBuffer::new("SELECT * FROM products;")),
            PathBuf::from("."),
            "test",
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_editor_insert_and_backspace_unicode() {
        let mut editor = EditorState::new("");
        editor.insert('é');
        editor.insert('x');
        assert_eq!(editor.text(), "éx");
        editor.backspace();
        editor.backspace();
        assert_eq!(editor.text(), "");
        editor.backspace();
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_editor_vertical_movement() {
        let mut editor = EditorState::new("SELECT *\nFROM orders\nLIMIT 5");
        assert_eq!(editor.cursor_position(), (2, 7));

        editor.move_up();
        assert_eq!(editor.cursor_position(), (1, 7));
        editor.move_up();
        assert_eq!(editor.cursor_position(), (0, 7));
        editor.move_up();
        assert_eq!(editor.cursor_position(), (0, 0));

        editor.move_end();
        editor.move_down();
        assert_eq!(editor.cursor_position(), (1, 8));
        editor.move_down();
        assert_eq!(editor.cursor_position(), (2, 7));
    }

    #[test]
    fn test_editor_home_end_delete() {
        let mut editor = EditorState::new("ab\ncd");
        editor.move_home();
        assert_eq!(editor.cursor_position(), (1, 0));
        editor.delete();
        assert_eq!(editor.text(), "ab\nd");
        editor.move_left();
        editor.move_home();
        assert_eq!(editor.cursor(), 0);
        editor.move_end();
        assert_eq!(editor.cursor(), 2);
    }

    #[test]
    fn test_typing_publishes_query() {
        let query = Arc::new(QueryBuffer::default());
        let mut app = App::new(Arc::clone(&query), PathBuf::from("."), "test");

        app.type_text("SELECT * FROM orders");
        app.handle_key(key(KeyCode::Backspace));

        assert_eq!(query.text(), "SELECT * FROM order");
    }

    #[test]
    fn test_run_shortcut_depends_on_focus() {
        let mut app = app();
        let trigger = app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL));
        assert_eq!(
            trigger,
            Some(Trigger::EditorCommand("SELECT * FROM products;".into()))
        );

        app.focus = Focus::Search;
        assert_eq!(app.handle_key(key(KeyCode::F(5))), Some(Trigger::Accelerator));

        app.focus = Focus::RunButton;
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Some(Trigger::RunButton));
    }

    #[test]
    fn test_plain_enter_in_editor_inserts_newline() {
        let mut app = app();
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
        assert!(app.editor.text().ends_with('\n'));
    }

    #[test]
    fn test_toggle_comment_and_format() {
        let mut app = app();
        app.handle_key(ctrl('/'));
        assert_eq!(app.editor.text(), "-- SELECT * FROM products;");
        assert_eq!(app.query.text(), "-- SELECT * FROM products;");

        app.editor.set_text("SELECT  a ,b\nFROM orders");
        app.handle_key(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::ALT));
        assert_eq!(app.editor.text(), "SELECT a, b FROM orders");
    }

    #[test]
    fn test_informational_toasts() {
        let mut app = app();
        app.handle_key(ctrl('s'));
        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.notification.title, "Query Saved");
        assert_eq!(toast.notification.level, NotificationLevel::Info);

        app.handle_key(ctrl('z'));
        let undo = &app.toast.as_ref().unwrap().notification;
        assert_eq!(undo.title, "Undo");
        assert_eq!(undo.description, "Undo functionality not implemented");

        app.handle_key(ctrl('y'));
        let redo = &app.toast.as_ref().unwrap().notification;
        assert_eq!(redo.title, "Redo");
        assert_eq!(redo.description, "Redo functionality not implemented");
    }

    #[test]
    fn test_template_picker() {
        let mut app = app();
        app.handle_key(ctrl('t'));
        assert!(app.picker.is_some());

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));

        assert!(app.picker.is_none());
        assert_eq!(app.editor.text(), TEMPLATES[1].sql);
        assert_eq!(app.query.text(), TEMPLATES[1].sql);
    }

    #[test]
    fn test_apply_template_by_name() {
        let mut app = app();
        assert!(app.apply_template("Recent Orders"));
        assert!(app.query.text().contains("LIMIT 20"));
        assert!(!app.apply_template("No Such Template"));
    }

    #[test]
    fn test_search_typing_and_scroll_reset() {
        let dataset = Dataset::new(
            vec!["n".into()],
            (0..30).map(|i| vec![Value::Int(i)]).collect(),
        );
        let mut app = app();
        app.sync_state(ExecutionState::Succeeded {
            result: Arc::new(ResultSet::new(TableName::Orders, Arc::new(dataset), None)),
        });

        app.focus = Focus::Search;
        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.table_scroll, 10);

        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.results.search(), "2");
        assert_eq!(app.table_scroll, 0);
        // 2, 12 and 20..=29
        assert_eq!(app.results.filtered(&app.execution).len(), 12);
    }

    #[test]
    fn test_export_without_results_shows_error() {
        let mut app = app();
        app.handle_key(ctrl('e'));
        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.notification.level, NotificationLevel::Error);
    }

    #[test]
    fn test_focus_cycle_and_quit() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::RunButton);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Search);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Editor);

        app.handle_key(ctrl('q'));
        assert!(!app.running);
    }
}
