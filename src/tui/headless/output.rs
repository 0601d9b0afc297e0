//! Reports for a finished headless run.
//!
//! The text report is the final screen followed by a summary line. JSON
//! adds the state snapshot, and the frames report dumps every captured
//! screen in order.

use std::fmt::Write;

use super::{HeadlessResult, HeadlessState};
use crate::cli::OutputFormat;
use ratatui::buffer::Buffer;
use serde::Serialize;

/// Turns a test terminal buffer into plain text.
pub struct ScreenRenderer;

impl ScreenRenderer {
    /// Returns the buffer as lines with trailing spaces and trailing empty
    /// lines removed. The result always ends in a newline.
    pub fn render(buffer: &Buffer) -> String {
        let width = usize::from(buffer.area.width);
        if width == 0 || buffer.area.height == 0 {
            return "\n".to_string();
        }

        let mut lines: Vec<String> = buffer
            .content()
            .chunks(width)
            .map(|row| {
                let line: String = row.iter().map(|cell| cell.symbol()).collect();
                line.trim_end().to_string()
            })
            .collect();

        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    screen: &'a str,
    screen_lines: &'a [String],
    events_executed: usize,
    duration_ms: u128,
    assertions: AssertionReport<'a>,
    state: &'a HeadlessState,
}

#[derive(Debug, Serialize)]
struct AssertionReport<'a> {
    passed: usize,
    failed: usize,
    failures: &'a [String],
}

/// Formats a headless result in the requested format.
pub struct HeadlessOutput {
    format: OutputFormat,
}

impl HeadlessOutput {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, result: &HeadlessResult) -> String {
        match self.format {
            OutputFormat::Text => text_report(result),
            OutputFormat::Json => json_report(result),
            OutputFormat::Frames => frames_report(result),
        }
    }
}

fn ran_assertions(result: &HeadlessResult) -> bool {
    result.assertions_passed + result.assertions_failed > 0
}

fn text_report(result: &HeadlessResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", result.screen);
    let _ = write!(
        out,
        "Events: {} executed in {}ms",
        result.events_executed,
        result.duration.as_millis()
    );
    if ran_assertions(result) {
        let _ = write!(
            out,
            " | Assertions: {} passed, {} failed",
            result.assertions_passed, result.assertions_failed
        );
    }
    out.push('\n');
    for failure in &result.failures {
        let _ = writeln!(out, "FAILED: {failure}");
    }
    out
}

fn json_report(result: &HeadlessResult) -> String {
    let report = JsonReport {
        screen: &result.screen,
        screen_lines: &result.screen_lines,
        events_executed: result.events_executed,
        duration_ms: result.duration.as_millis(),
        assertions: AssertionReport {
            passed: result.assertions_passed,
            failed: result.assertions_failed,
            failures: &result.failures,
        },
        state: &result.state,
    };

    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize report: {e}\"}}"))
}

fn frames_report(result: &HeadlessResult) -> String {
    let mut out = String::new();
    for frame in &result.frames {
        let _ = writeln!(
            out,
            "=== FRAME {} ({}) ===\n{}\n",
            frame.number,
            frame.event.as_deref().unwrap_or("initial"),
            frame.screen
        );
    }
    let _ = writeln!(
        out,
        "Total: {} frames, {} events executed in {}ms",
        result.frames.len(),
        result.events_executed,
        result.duration.as_millis()
    );
    if ran_assertions(result) {
        let _ = writeln!(
            out,
            "Assertions: {} passed, {} failed",
            result.assertions_passed, result.assertions_failed
        );
    }
    out
}
