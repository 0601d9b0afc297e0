//! Event handling for the TUI.
//!
//! Polls crossterm for keyboard and terminal events.

use crate::error::{PlaygroundError, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Terminal events the main loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// Nothing happened within the tick rate.
    Tick,
}

impl From<CrosstermEvent> for Event {
    fn from(event: CrosstermEvent) -> Self {
        match event {
            // Release events would fire every shortcut twice on some terminals.
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Self::Key(key),
            CrosstermEvent::Resize(width, height) => Self::Resize(width, height),
            _ => Self::Tick,
        }
    }
}

/// Polls terminal events at a fixed tick rate.
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a new event handler with the default tick rate.
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }

    /// Blocks for up to one tick waiting for the next event.
    pub fn next(&self) -> Result<Event> {
        let ready = event::poll(self.tick_rate)
            .map_err(|e| PlaygroundError::internal(format!("Failed to poll events: {e}")))?;
        if !ready {
            return Ok(Event::Tick);
        }

        let event = event::read()
            .map_err(|e| PlaygroundError::internal(format!("Failed to read event: {e}")))?;
        Ok(event.into())
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
