//! The shared query text.
//!
//! The editor writes every change here; the run button and the accelerator
//! read from here when they execute. Changes are broadcast over a watch
//! channel so other views can follow the text.

use regex::Regex;
use std::sync::LazyLock;
use tokio::sync::watch;

/// Observable holder for the current query text.
#[derive(Debug)]
pub struct QueryBuffer {
    tx: watch::Sender<String>,
}

impl QueryBuffer {
    /// Creates a buffer holding the given text.
    pub fn new(initial: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(initial.into());
        Self { tx }
    }

    /// Returns a copy of the current text.
    pub fn text(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Replaces the text and notifies subscribers.
    pub fn replace(&self, text: impl Into<String>) {
        self.tx.send_replace(text.into());
    }

    /// Subscribes to text changes.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Default for QueryBuffer {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Comment marker at the start of a line, after any indentation.
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)--\s*").expect("valid comment pattern"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*").expect("valid comma pattern"));

static EQUALS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*=\s*").expect("valid equals pattern"));

/// Toggles `-- ` line comments.
///
/// Commented lines lose their marker (and the whitespace after it), keeping
/// any indentation; every other line gains a `-- ` prefix.
pub fn toggle_comment(sql: &str) -> String {
    sql.split('\n')
        .map(|line| {
            if COMMENT_RE.is_match(line) {
                COMMENT_RE.replace(line, "$1").into_owned()
            } else {
                format!("-- {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapses whitespace onto one line and normalizes spacing around `,` and `=`.
pub fn format_sql(sql: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(sql, " ");
    let commas = COMMA_RE.replace_all(&collapsed, ", ");
    EQUALS_RE.replace_all(&commas, " = ").trim().to_string()
}
