//! Terminal User Interface for the playground.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
mod events;
pub mod headless;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use events::{Event, EventHandler};

use crate::config::Config;
use crate::error::{PlaygroundError, Result};
use crate::notify::Notification;
use crate::session::Playground;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;

        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| PlaygroundError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|e| {
            PlaygroundError::internal(format!("Failed to enter alternate screen: {e}"))
        })?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)
            .map_err(|e| PlaygroundError::internal(format!("Failed to create terminal: {e}")))?;

        Ok(terminal)
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| PlaygroundError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .map_err(|e| PlaygroundError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| PlaygroundError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the main event loop over a session until the user quits.
    pub async fn run(
        &mut self,
        playground: &Playground,
        notifications: mpsc::UnboundedReceiver<Notification>,
    ) -> Result<()> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        let mut app = App::new(
            playground.query().clone(),
            playground.export_dir().to_path_buf(),
            playground.source(),
        );

        let result = self.run_event_loop(&mut app, playground, notifications).await;

        let _ = panic::take_hook();

        result
    }

    /// The main event loop, separated for cleaner error handling.
    async fn run_event_loop(
        &mut self,
        app: &mut App,
        playground: &Playground,
        mut notifications: mpsc::UnboundedReceiver<Notification>,
    ) -> Result<()> {
        let mut state_rx = playground.state().subscribe();
        let mut input: Option<JoinHandle<Result<Event>>> = None;

        loop {
            app.clear_expired_toast();

            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| PlaygroundError::internal(format!("Failed to draw: {e}")))?;

            if !app.running {
                break;
            }

            // One poll stays in flight across iterations.
            let handler = self.event_handler;
            let poll = input.get_or_insert_with(|| {
                tokio::task::spawn_blocking(move || handler.next())
            });

            tokio::select! {
                event = poll => {
                    input = None;
                    let event = event
                        .map_err(|e| PlaygroundError::internal(format!("Event task failed: {e}")))??;
                    if let Event::Key(key) = event {
                        if let Some(trigger) = app.handle_key(key) {
                            // The task outlives the handle; completion arrives via state.
                            drop(playground.fire(trigger));
                        }
                    }
                }

                changed = state_rx.changed() => {
                    if changed.is_err() {
                        warn!("Execution state channel closed");
                        break;
                    }
                    let state = state_rx.borrow_and_update().clone();
                    debug!("Execution state changed to {}", state.phase());
                    app.sync_state(state);
                }

                Some(notification) = notifications.recv() => {
                    app.show(notification);
                }
            }
        }

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Starts a session from the config and runs the interactive TUI.
pub async fn run(config: &Config) -> Result<()> {
    let (playground, notifications) = Playground::start(config).await?;
    info!(
        "Playground ready ({} policy, data from {})",
        playground.policy(),
        playground.source()
    );

    let mut tui = Tui::new()?;
    tui.run(&playground, notifications).await
}
