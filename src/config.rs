//! Configuration management for the playground.
//!
//! Handles loading configuration from a TOML file. Every section is
//! optional; a missing file yields the defaults.

use crate::dataset::TableName;
use crate::error::{PlaygroundError, Result};
use crate::query::{LatencyModel, RunPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Where the sample tables come from.
    #[serde(default)]
    pub data: DataConfig,

    /// Execution behavior.
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// CSV export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Dataset source configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DataConfig {
    /// Directory holding `<table>.json` files. The built-in sample data is
    /// used when unset.
    pub dir: Option<PathBuf>,
}

/// Execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionConfig {
    /// Simulated latency applied to every query, in milliseconds.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// How overlapping executions resolve.
    #[serde(default)]
    pub policy: RunPolicy,

    /// Per-table latency overrides. Keys outside the four tables fail to
    /// deserialize.
    #[serde(default)]
    pub table_latency_ms: BTreeMap<TableName, u64>,
}

fn default_latency_ms() -> u64 {
    500
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            policy: RunPolicy::default(),
            table_latency_ms: BTreeMap::new(),
        }
    }
}

impl ExecutionConfig {
    /// Builds the latency model from the base delay and the overrides.
    pub fn latency_model(&self) -> LatencyModel {
        self.table_latency_ms.iter().fold(
            LatencyModel::fixed(Duration::from_millis(self.latency_ms)),
            |model, (table, ms)| model.with_table(*table, Duration::from_millis(*ms)),
        )
    }
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// Directory CSV files are written to.
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("db-playground")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| PlaygroundError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            PlaygroundError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
