//! Headless mode for scripted testing and automation.
//!
//! Runs the playground UI without a terminal, executing scripted events
//! against a real session and capturing the rendered screen for verification.

mod events;
mod output;

pub use events::{Assertion, Comparison, Event, EventParser};
pub use output::{HeadlessOutput, ScreenRenderer};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::{PlaygroundError, Result};
use crate::notify::Notification;
use crate::query::ExecutionOutcome;
use crate::session::Playground;
use crate::tui::app::App;
use crate::tui::ui;
use futures::future::join_all;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Screen and report settings for a headless run.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub width: u16,
    pub height: u16,
    pub output_format: OutputFormat,
    /// Stop at the first failed assertion.
    pub fail_fast: bool,
    /// Report destination; stdout when unset.
    pub output_file: Option<std::path::PathBuf>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 30,
            output_format: OutputFormat::Text,
            fail_fast: false,
            output_file: None,
        }
    }
}

impl HeadlessConfig {
    /// Takes the headless flags from the command line.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            width: cli.size.width,
            height: cli.size.height,
            output_format: cli.output,
            fail_fast: cli.fail_fast,
            output_file: cli.output_file.clone(),
        }
    }
}

/// Everything a headless run produced.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen, trimmed.
    pub screen: String,
    pub screen_lines: Vec<String>,
    pub events_executed: usize,
    pub duration: Duration,
    pub assertions_passed: usize,
    pub assertions_failed: usize,
    /// The failed assertions as written in the script.
    pub failures: Vec<String>,
    pub state: HeadlessState,
    /// Screens captured after each event in frames mode.
    pub frames: Vec<Frame>,
}

/// Snapshot of application state for assertions and JSON output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeadlessState {
    /// Execution phase (idle, running, succeeded, failed).
    pub phase: String,
    /// Rows in the last successful result; 0 in any other phase.
    pub row_count: usize,
    /// Rows on screen before filtering, including retained rows.
    pub visible_count: usize,
    /// Rows on screen after filtering.
    pub filtered_count: usize,
    /// Current editor text.
    pub query: String,
    /// Current search term.
    pub search: String,
    /// Error message of a failed execution, empty otherwise.
    pub error: String,
    /// Focused control.
    pub focus: String,
    /// Whether the app is still running.
    pub running: bool,
    /// Title of the toast on screen, empty if none.
    pub toast: String,
}

impl HeadlessState {
    /// Takes a snapshot of the app.
    pub fn from_app(app: &App) -> Self {
        let execution = &app.execution;
        Self {
            phase: execution.phase().to_string(),
            row_count: execution.result().map_or(0, |result| result.row_count()),
            visible_count: execution
                .visible_result()
                .map_or(0, |result| result.row_count()),
            filtered_count: app.results.filtered(execution).len(),
            query: app.editor.text().to_string(),
            search: app.results.search().to_string(),
            error: execution.error_message().unwrap_or_default().to_string(),
            focus: app.focus.as_str().to_string(),
            running: app.running,
            toast: app
                .toast
                .as_ref()
                .map(|toast| toast.notification.title.clone())
                .unwrap_or_default(),
        }
    }

    /// Returns a field by name as a string.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "phase" => Some(self.phase.clone()),
            "row_count" => Some(self.row_count.to_string()),
            "visible_count" => Some(self.visible_count.to_string()),
            "filtered_count" => Some(self.filtered_count.to_string()),
            "query" => Some(self.query.clone()),
            "search" => Some(self.search.clone()),
            "error" => Some(self.error.clone()),
            "focus" => Some(self.focus.clone()),
            "running" => Some(self.running.to_string()),
            "toast" => Some(self.toast.clone()),
            _ => None,
        }
    }
}

/// A captured frame (screen state after an event).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number (0 = initial state).
    pub number: usize,
    /// Event that produced this frame (None for initial).
    pub event: Option<String>,
    /// Screen content.
    pub screen: String,
}

/// Runs the playground UI in headless mode.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    playground: Playground,
    notifications: mpsc::UnboundedReceiver<Notification>,
    pending: Vec<JoinHandle<ExecutionOutcome>>,
    events: Vec<Event>,
    frames: Vec<Frame>,
    start_time: Instant,
    assertions_passed: usize,
    assertions_failed: usize,
    failures: Vec<String>,
}

impl HeadlessRunner {
    /// Creates a new headless runner over a session.
    pub fn new(
        config: HeadlessConfig,
        playground: Playground,
        notifications: mpsc::UnboundedReceiver<Notification>,
    ) -> Result<Self> {
        let backend = TestBackend::new(config.width, config.height);
        let terminal = Terminal::new(backend).map_err(|e| {
            PlaygroundError::internal(format!("Failed to create test terminal: {e}"))
        })?;

        let app = App::new(
            playground.query().clone(),
            playground.export_dir().to_path_buf(),
            playground.source(),
        );

        Ok(Self {
            config,
            terminal,
            app,
            playground,
            notifications,
            pending: Vec::new(),
            events: Vec::new(),
            frames: Vec::new(),
            start_time: Instant::now(),
            assertions_passed: 0,
            assertions_failed: 0,
            failures: Vec::new(),
        })
    }

    /// Loads events from a string (comma-separated or newline-separated).
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        let parser = EventParser::new();
        self.events = parser.parse_all(input)?;
        Ok(())
    }

    /// Loads events from a script file, or stdin when `path` is "-".
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| PlaygroundError::internal(format!("Failed to read stdin: {e}")))?;
            buffer
        } else {
            std::fs::read_to_string(path).map_err(|e| {
                PlaygroundError::internal(format!("Failed to read script file: {e}"))
            })?
        };

        self.load_events(&content)
    }

    /// Runs the headless execution and returns the result.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        self.start_time = Instant::now();

        self.capture_frame(None)?;

        let events = std::mem::take(&mut self.events);
        let mut events_executed = 0;

        for event in events {
            let event_str = event.to_string();
            debug!("Headless event: {}", event_str);

            match &event {
                Event::Key(key) => {
                    if let Some(trigger) = self.app.handle_key(*key) {
                        self.pending.push(self.playground.fire(trigger));
                    }
                }
                Event::Type(text) => self.app.type_text(text),
                Event::Wait(duration) => tokio::time::sleep(*duration).await,
                Event::Resize(w, h) => {
                    self.terminal
                        .resize(ratatui::layout::Rect::new(0, 0, *w, *h))
                        .map_err(|e| PlaygroundError::internal(format!("Resize failed: {e}")))?;
                }
                Event::Snapshot(_name) => {
                    // Snapshots are captured as frames
                }
                Event::Template(name) => {
                    if !self.app.apply_template(name) {
                        return Err(PlaygroundError::config(format!(
                            "Unknown template: '{}'",
                            name
                        )));
                    }
                }
                Event::Search(term) => self.app.set_search(term.clone()),
                Event::Focus(focus) => self.app.focus = *focus,
                Event::Settle => self.settle().await?,
                Event::Export => self.app.export(),
                Event::Assert(assertion) => {
                    self.refresh();
                    self.draw()?;
                    let screen = self.render_screen();
                    let state = HeadlessState::from_app(&self.app);
                    if assertion.check(&screen, &state) {
                        self.assertions_passed += 1;
                    } else {
                        self.assertions_failed += 1;
                        self.failures.push(event_str.clone());
                        if self.config.fail_fast {
                            break;
                        }
                    }
                }
            }

            events_executed += 1;

            self.refresh();
            self.draw()?;

            if self.config.output_format == OutputFormat::Frames {
                self.capture_frame(Some(event_str))?;
            }

            if !self.app.running {
                break;
            }
        }

        self.refresh();
        self.draw()?;

        let screen = self.render_screen();
        let screen_lines = screen.lines().map(String::from).collect();

        Ok(HeadlessResult {
            screen,
            screen_lines,
            events_executed,
            duration: self.start_time.elapsed(),
            assertions_passed: self.assertions_passed,
            assertions_failed: self.assertions_failed,
            failures: self.failures,
            state: HeadlessState::from_app(&self.app),
            frames: self.frames,
        })
    }

    /// Waits for every started execution to land.
    async fn settle(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        debug!("Settling {} executions", pending.len());
        for joined in join_all(pending).await {
            joined.map_err(|e| {
                PlaygroundError::internal(format!("Execution task failed: {e}"))
            })?;
        }
        Ok(())
    }

    /// Pulls the latest execution state and notifications into the app.
    fn refresh(&mut self) {
        while let Ok(notification) = self.notifications.try_recv() {
            self.app.show(notification);
        }
        self.app.clear_expired_toast();
        self.app.sync_state(self.playground.state().snapshot());
        self.pending.retain(|handle| !handle.is_finished());
    }

    fn draw(&mut self) -> Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, &self.app))
            .map_err(|e| PlaygroundError::internal(format!("Failed to render: {e}")))?;
        Ok(())
    }

    /// Renders the current screen to a string.
    fn render_screen(&self) -> String {
        ScreenRenderer::render(self.terminal.backend().buffer())
    }

    /// Captures the current frame.
    fn capture_frame(&mut self, event: Option<String>) -> Result<()> {
        self.draw()?;

        let screen = self.render_screen();
        let number = self.frames.len();

        self.frames.push(Frame {
            number,
            event,
            screen,
        });

        Ok(())
    }
}

/// Runs headless mode from CLI arguments. Returns the process exit code.
pub async fn run_headless(cli: &Cli, config: &Config) -> Result<i32> {
    cli.validate_headless().map_err(PlaygroundError::config)?;

    let headless_config = HeadlessConfig::from_cli(cli);
    let (playground, notifications) = Playground::start(config).await?;
    let mut runner = HeadlessRunner::new(headless_config.clone(), playground, notifications)?;

    if let Some(ref events_str) = cli.events {
        runner.load_events(events_str)?;
    } else if let Some(ref script_path) = cli.script {
        runner.load_script(script_path)?;
    }

    let result = runner.run().await?;
    info!(
        "Headless run finished: {} events, {} assertions failed",
        result.events_executed, result.assertions_failed
    );

    let output = HeadlessOutput::new(headless_config.output_format);
    let output_str = output.format(&result);

    if let Some(ref path) = headless_config.output_file {
        std::fs::write(path, &output_str).map_err(|e| {
            PlaygroundError::internal(format!("Failed to write output file: {e}"))
        })?;
    } else {
        print!("{}", output_str);
    }

    if result.assertions_failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}
