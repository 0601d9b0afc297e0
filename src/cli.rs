//! Command-line arguments.
//!
//! Flags that mirror config keys override the loaded file; the rest drive
//! headless mode.

use crate::config::Config;
use crate::query::RunPolicy;
use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Report format for headless mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Final screen and a summary line.
    #[default]
    Text,
    /// Screen, state snapshot and assertion results.
    Json,
    /// Every captured screen in order.
    Frames,
}

/// Virtual screen size for headless mode, written `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u16,
    pub height: u16,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 100,
            height: 30,
        }
    }
}

impl FromStr for ScreenSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once('x')
            .ok_or_else(|| format!("Invalid size '{s}'. Expected WIDTHxHEIGHT (e.g., 100x30)"))?;
        Ok(Self {
            width: width
                .parse()
                .map_err(|_| format!("Invalid width: '{width}'"))?,
            height: height
                .parse()
                .map_err(|_| format!("Invalid height: '{height}'"))?,
        })
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A terminal playground for running simple queries against sample datasets.
#[derive(Parser, Debug)]
#[command(name = "playground")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory with products.json, customers.json, orders.json and employees.json
    #[arg(long, value_name = "DIR", env = "PLAYGROUND_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Simulated query latency in milliseconds
    #[arg(long, value_name = "MS")]
    pub latency_ms: Option<u64>,

    /// How overlapping executions resolve
    #[arg(long, value_enum, value_name = "POLICY")]
    pub policy: Option<RunPolicy>,

    /// Directory CSV exports are written to
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Run without a terminal, driven by scripted events
    #[arg(long)]
    pub headless: bool,

    /// Events to run in headless mode (e.g., "type:SELECT * FROM orders,key:f5,settle")
    #[arg(long, value_name = "EVENTS", conflicts_with = "script")]
    pub events: Option<String>,

    /// Script file with one event per line ("-" reads stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Virtual screen size for headless mode
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value_t = ScreenSize::default())]
    pub size: ScreenSize,

    /// Headless report format
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Write the headless report to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Stop at the first failed assertion
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The `--config` path, or the default location.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies the flags that were given on top of a loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.data.dir = Some(dir.clone());
        }
        if let Some(ms) = self.latency_ms {
            config.execution.latency_ms = ms;
        }
        if let Some(policy) = self.policy {
            config.execution.policy = policy;
        }
        if let Some(dir) = &self.export_dir {
            config.export.dir = dir.clone();
        }
    }

    pub fn is_headless(&self) -> bool {
        self.headless
    }

    /// Checks the flag combinations clap cannot express.
    pub fn validate_headless(&self) -> Result<(), String> {
        if self.headless && self.events.is_none() && self.script.is_none() {
            return Err("--headless requires --events or --script".to_string());
        }
        Ok(())
    }
}
