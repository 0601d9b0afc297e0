//! Global keyboard shortcuts.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// An action bound to a global shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Ctrl+Enter (Cmd+Enter where the terminal reports it) or F5.
    RunQuery,
    /// Ctrl+/
    ToggleComment,
    /// Alt+F
    FormatQuery,
    /// Ctrl+S
    SaveQuery,
    /// Ctrl+Z
    Undo,
    /// Ctrl+Y
    Redo,
    /// Ctrl+E
    Export,
    /// Ctrl+T
    Templates,
    /// Tab
    NextFocus,
    /// Ctrl+C or Ctrl+Q
    Quit,
}

/// Maps a key event to a global action, if it is bound to one.
pub fn action_for(key: &KeyEvent) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let command = key.modifiers.contains(KeyModifiers::SUPER);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let action = match key.code {
        KeyCode::Enter if ctrl || command => KeyAction::RunQuery,
        KeyCode::F(5) => KeyAction::RunQuery,
        // Most terminals report Ctrl+/ as Ctrl+7 or Ctrl+_.
        KeyCode::Char('/') | KeyCode::Char('7') | KeyCode::Char('_') if ctrl => {
            KeyAction::ToggleComment
        }
        KeyCode::Char('f') | KeyCode::Char('F') if alt => KeyAction::FormatQuery,
        KeyCode::Char('s') if ctrl => KeyAction::SaveQuery,
        KeyCode::Char('z') if ctrl => KeyAction::Undo,
        KeyCode::Char('y') if ctrl => KeyAction::Redo,
        KeyCode::Char('e') if ctrl => KeyAction::Export,
        KeyCode::Char('t') if ctrl => KeyAction::Templates,
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => KeyAction::Quit,
        KeyCode::Tab => KeyAction::NextFocus,
        _ => return None,
    };

    Some(action)
}
