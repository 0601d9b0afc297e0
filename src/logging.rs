//! Tracing setup.
//!
//! The interactive UI owns the terminal, so it logs to a file in the state
//! directory. Headless runs log to stderr, next to their report on stdout.
//! `RUST_LOG` overrides the default `info` filter in both cases.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// `playground.log`, truncated on every start.
    File,
    Stderr,
}

impl LogTarget {
    pub fn for_mode(headless: bool) -> Self {
        if headless {
            Self::Stderr
        } else {
            Self::File
        }
    }
}

/// Installs the global subscriber. Logging is skipped with a warning when
/// the log file cannot be created.
pub fn init(target: LogTarget) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).init(),
        LogTarget::File => match open_log_file() {
            Ok(file) => builder.with_writer(file).with_ansi(false).init(),
            Err(e) => eprintln!("Warning: logging disabled: {e}"),
        },
    }
}

fn open_log_file() -> std::io::Result<File> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// `~/.local/state/db-playground/playground.log` on Linux; the config
/// directory or the temp directory where there is no state directory.
pub fn log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("db-playground"))
        .unwrap_or_else(std::env::temp_dir)
        .join("playground.log")
}
