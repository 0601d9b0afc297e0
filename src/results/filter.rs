//! Live substring search over result rows.

use crate::dataset::{Row, Value};

/// Keeps the rows where any value contains `term`, ignoring case.
///
/// Values are compared in their plain textual form, so NULL matches only the
/// empty term. An empty term keeps every row. Order is preserved and rows
/// are borrowed, never copied, so filtering a filtered set is cheap and gives
/// the same rows back.
pub fn filter_rows<'a, I>(rows: I, term: &str) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    if term.is_empty() {
        return rows.into_iter().collect();
    }

    let needle = term.to_lowercase();
    rows.into_iter()
        .filter(|row| row_matches(row, &needle))
        .collect()
}

/// Returns true if any value in the row contains the lowercased needle.
fn row_matches(row: &[Value], needle: &str) -> bool {
    row.iter()
        .any(|value| value.to_text().to_lowercase().contains(needle))
}
