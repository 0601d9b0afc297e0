//! The results view: search, header display and CSV export.
//!
//! Everything here derives from the rows the execution state makes visible.
//! The search term lives here, not in the execution state, and survives new
//! executions.

pub mod export;
pub mod filter;

pub use export::{encode, export_file_name, write_csv, BOM, EXPORT_BATCH_SIZE};
pub use filter::filter_rows;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::dataset::Row;
use crate::error::{PlaygroundError, Result};
use crate::state::ExecutionState;

/// View-side state over the latest visible result.
#[derive(Debug, Default, Clone)]
pub struct ResultsView {
    search: String,
}

impl ResultsView {
    /// Creates a view with an empty search term.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the search term.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replaces the search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Returns a mutable handle to the search term for in-place editing.
    pub fn search_mut(&mut self) -> &mut String {
        &mut self.search
    }

    /// Returns the visible rows that match the search term.
    pub fn filtered<'a>(&self, state: &'a ExecutionState) -> Vec<&'a Row> {
        match state.visible_result() {
            Some(result) => filter_rows(result.rows(), &self.search),
            None => Vec::new(),
        }
    }

    /// Returns the display headers of the visible result.
    pub fn headers(&self, state: &ExecutionState) -> Vec<String> {
        state
            .visible_result()
            .map(|result| result.columns().iter().map(|c| humanize_header(c)).collect())
            .unwrap_or_default()
    }

    /// Writes the filtered rows as CSV into `dir` and returns the file path.
    ///
    /// Refuses when there is no visible result or it has no rows. A search
    /// that matches nothing still exports the header line.
    pub fn export(&self, state: &ExecutionState, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
        let result = state
            .visible_result()
            .filter(|result| !result.is_empty())
            .ok_or_else(|| PlaygroundError::export("No results to export"))?;

        let rows = filter_rows(result.rows(), &self.search);
        let path = dir.join(export_file_name(now));

        let file = File::create(&path).map_err(|e| {
            PlaygroundError::export(format!("Failed to create {}: {e}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);
        write_csv(&mut writer, result.columns(), rows.iter().copied()).map_err(|e| {
            PlaygroundError::export(format!("Failed to write {}: {e}", path.display()))
        })?;

        info!("Exported {} rows to {}", rows.len(), path.display());
        Ok(path)
    }
}

/// Turns a raw column name into its display form.
///
/// Inserts a space where a lowercase letter or digit is followed by an
/// uppercase one, and before the last capital of an acronym that starts a
/// new word: `CustomerID` becomes `Customer ID`, `HTMLPage` becomes
/// `HTML Page`.
pub fn humanize_header(column: &str) -> String {
    let chars: Vec<char> = column.chars().collect();
    let mut out = String::with_capacity(column.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let word_start = prev.is_lowercase() || prev.is_ascii_digit();
            let acronym_end = prev.is_uppercase() && next_is_lower;
            if word_start || acronym_end {
                out.push(' ');
            }
        }
        out.push(c);
    }

    out
}
