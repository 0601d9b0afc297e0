//! CSV encoding for result exports.
//!
//! The output is what spreadsheet tools expect from a download: a UTF-8 BOM,
//! a header line of raw column names, then one line per row joined with
//! `\n` (no trailing newline). Strings are always quoted, NULL is an empty
//! field, everything else is written bare.

use std::io::{self, Write};

use chrono::{DateTime, Utc};

use crate::dataset::{Row, Value};

/// Byte order mark written at the start of every export.
pub const BOM: &str = "\u{feff}";

/// Rows encoded per write.
pub const EXPORT_BATCH_SIZE: usize = 1000;

/// Encodes a single field.
pub fn encode_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => format!("\"{}\"", s.replace('"', "\"\"")),
        other => other.to_text(),
    }
}

fn encode_row(row: &[Value]) -> String {
    row.iter().map(encode_field).collect::<Vec<_>>().join(",")
}

/// Streams the export to `writer`, one batch of rows at a time.
pub fn write_csv<'a, W, I>(writer: &mut W, headers: &[String], rows: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Row>,
{
    writer.write_all(BOM.as_bytes())?;
    writer.write_all(headers.join(",").as_bytes())?;

    let rows: Vec<&Row> = rows.into_iter().collect();
    for batch in rows.chunks(EXPORT_BATCH_SIZE) {
        let mut chunk = String::new();
        for row in batch {
            chunk.push('\n');
            chunk.push_str(&encode_row(row));
        }
        writer.write_all(chunk.as_bytes())?;
    }

    writer.flush()
}

/// Encodes the export into a string.
pub fn encode<'a, I>(headers: &[String], rows: I) -> String
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_csv(&mut out, headers, rows);
    String::from_utf8_lossy(&out).into_owned()
}

/// Returns the download name for an export made at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("query_results_{}.csv", now.format("%Y-%m-%dT%H-%M-%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn headers() -> Vec<String> {
        vec!["ProductID".into(), "ProductName".into(), "UnitPrice".into(), "Discontinued".into()]
    }

    #[test]
    fn test_encode_fields() {
        assert_eq!(encode_field(&Value::Null), "");
        assert_eq!(encode_field(&Value::Int(7)), "7");
        assert_eq!(encode_field(&Value::Float(18.5)), "18.5");
        assert_eq!(encode_field(&Value::Float(18.0)), "18");
        assert_eq!(encode_field(&Value::Bool(false)), "false");
        assert_eq!(encode_field(&Value::from("Chai")), "\"Chai\"");
        assert_eq!(
            encode_field(&Value::from("Uncle Bob's \"Organic\" Pears")),
            "\"Uncle Bob's \"\"Organic\"\" Pears\""
        );
    }

    #[test]
    fn test_encode_document() {
        let rows = vec![
            vec![Value::Int(1), Value::from("Chai"), Value::Float(18.0), Value::Bool(false)],
            vec![Value::Int(2), Value::from("a,b"), Value::Null, Value::Bool(true)],
        ];

        let csv = encode(&headers(), &rows);

        assert_eq!(
            csv,
            "\u{feff}ProductID,ProductName,UnitPrice,Discontinued\n\
             1,\"Chai\",18,false\n\
             2,\"a,b\",,true"
        );
    }

    #[test]
    fn test_encode_headers_only() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(
            encode(&headers(), &rows),
            "\u{feff}ProductID,ProductName,UnitPrice,Discontinued"
        );
    }

    #[test]
    fn test_batches_cover_every_row() {
        let rows: Vec<Row> = (0..(EXPORT_BATCH_SIZE as i64 * 2 + 5))
            .map(|i| vec![Value::Int(i)])
            .collect();

        let csv = encode(&["n".to_string()], &rows);
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines.len(), rows.len() + 1);
        assert_eq!(lines[1], "0");
        assert_eq!(*lines.last().unwrap(), (rows.len() - 1).to_string());
    }

    #[test]
    fn test_export_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(export_file_name(now), "query_results_2024-03-09T14-05-07.csv");
    }
}
