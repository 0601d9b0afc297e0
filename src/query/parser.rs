//! Best-effort query parsing.
//!
//! Extracts the table after `FROM` and an optional row count after `LIMIT`.
//! Everything else in the query text is ignored; this is not a SQL parser.

use crate::error::{PlaygroundError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// `from`, whitespace, then an ASCII word token.
static FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"from\s+((?-u:\w)+)").expect("valid FROM pattern"));

static LIMIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"limit\s+([0-9]+)").expect("valid LIMIT pattern"));

/// The parts of a query the executor acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Lowercased table token following `FROM`.
    pub table: String,
    /// Row limit following `LIMIT`, if one parses.
    pub limit: Option<usize>,
}

/// Parses a raw query string.
///
/// Matching runs on the lowercased text. The table is the first run of ASCII
/// letters, digits and underscores separated from a `from` keyword by
/// whitespace. A `limit` without a parsable integer yields no limit.
pub fn parse(raw: &str) -> Result<ParsedQuery> {
    let lowered = raw.to_lowercase();

    let table = FROM_RE
        .captures(&lowered)
        .map(|caps| caps[1].to_string())
        .ok_or(PlaygroundError::NoTableSpecified)?;

    let limit = LIMIT_RE
        .captures(&lowered)
        .and_then(|caps| caps[1].parse::<usize>().ok());

    Ok(ParsedQuery { table, limit })
}
