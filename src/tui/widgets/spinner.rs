//! Running indicator for the header.

use std::time::{Duration, Instant};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// A braille spinner that animates from the moment an execution starts.
#[derive(Debug, Clone)]
pub struct Spinner {
    started: Instant,
    label: String,
}

impl Spinner {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            started: Instant::now(),
            label: label.into(),
        }
    }

    /// The spinner shown while a query executes.
    pub fn running() -> Self {
        Self::new("Running query")
    }

    /// Returns the frame for the time elapsed since the spinner started.
    pub fn frame(&self) -> &'static str {
        frame_at(self.started.elapsed())
    }

    pub fn display(&self) -> String {
        format!("{} {}", self.frame(), self.label)
    }
}

fn frame_at(elapsed: Duration) -> &'static str {
    let step = elapsed.as_millis() / FRAME_INTERVAL.as_millis();
    FRAMES[(step % FRAMES.len() as u128) as usize]
}
