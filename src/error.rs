//! Error types for the playground.
//!
//! Defines the main error enum used throughout the application, plus the
//! narrower [`ErrorKind`] that query failures are reported with.

use serde::Serialize;
use thiserror::Error;

/// Classification of a failed query execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The query has no resolvable `FROM <table>` token.
    NoTableSpecified,
    /// The table token does not name a known dataset.
    TableNotFound,
    /// A dataset could not be loaded from its source.
    DatasetLoadFailure,
}

impl ErrorKind {
    /// Returns the kind as a short string for display and state snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoTableSpecified => "no_table_specified",
            Self::TableNotFound => "table_not_found",
            Self::DatasetLoadFailure => "dataset_load_failure",
        }
    }
}

/// Main error type for playground operations.
#[derive(Error, Debug)]
pub enum PlaygroundError {
    /// The query text contains no `FROM <table>` clause.
    #[error("No table specified in query")]
    NoTableSpecified,

    /// The query references a table outside the fixed dataset set.
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// A dataset source could not be read or decoded.
    #[error("Dataset error: {0}")]
    DatasetLoad(String),

    /// Configuration errors (invalid config file, unknown table names, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSV export errors (nothing to export, file not writable).
    #[error("Export error: {0}")]
    Export(String),

    /// Internal application errors (terminal failures, unexpected states).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaygroundError {
    /// Creates a table-not-found error for the given table token.
    pub fn table_not_found(table: impl Into<String>) -> Self {
        Self::TableNotFound(table.into())
    }

    /// Creates a dataset load error with the given message.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::DatasetLoad(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an export error with the given message.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the query failure kind, if this error can come out of a query run.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::NoTableSpecified => Some(ErrorKind::NoTableSpecified),
            Self::TableNotFound(_) => Some(ErrorKind::TableNotFound),
            Self::DatasetLoad(_) => Some(ErrorKind::DatasetLoadFailure),
            Self::Config(_) | Self::Export(_) | Self::Internal(_) => None,
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::NoTableSpecified | Self::TableNotFound(_) => "Query Error",
            Self::DatasetLoad(_) => "Dataset Error",
            Self::Config(_) => "Configuration Error",
            Self::Export(_) => "Export Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using PlaygroundError.
pub type Result<T> = std::result::Result<T, PlaygroundError>;
