//! CSV export of the filtered result, decoded back with the `csv` crate.

use super::instant_playground;
use chrono::{TimeZone, Utc};
use db_playground::results::{ResultsView, BOM};
use db_playground::trigger::Trigger;
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

fn read_export(path: &Path) -> (String, Vec<csv::StringRecord>, csv::StringRecord) {
    let raw = std::fs::read_to_string(path).unwrap();
    assert!(raw.starts_with(BOM), "export must start with a BOM");
    let body = raw[BOM.len()..].to_string();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let records = reader.records().map(|r| r.unwrap()).collect();
    (body, records, headers)
}

#[tokio::test]
async fn test_export_filtered_products() {
    let (playground, _notifications) = instant_playground().await;
    playground
        .fire(Trigger::EditorCommand("SELECT * FROM products".into()))
        .await
        .unwrap();

    let mut view = ResultsView::new();
    view.set_search("chef");

    let dir = TempDir::new().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 30).unwrap();
    let path = view
        .export(&playground.state().snapshot(), dir.path(), now)
        .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "query_results_2024-03-09T14-05-30.csv"
    );

    let (body, records, headers) = read_export(&path);
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "ProductID",
            "ProductName",
            "SupplierID",
            "CategoryID",
            "QuantityPerUnit",
            "UnitPrice",
            "UnitsInStock",
            "Discontinued",
        ]
    );
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][1], "Chef Anton's Cajun Seasoning");
    assert_eq!(&records[1][5], "21.35");
    assert!(!body.ends_with('\n'));
}

#[tokio::test]
async fn test_export_quotes_strings_and_blanks_nulls() {
    let (playground, _notifications) = instant_playground().await;
    playground
        .fire(Trigger::EditorCommand("SELECT * FROM products".into()))
        .await
        .unwrap();

    let mut view = ResultsView::new();
    view.set_search("pastora");

    let dir = TempDir::new().unwrap();
    let path = view
        .export(&playground.state().snapshot(), dir.path(), Utc::now())
        .unwrap();

    let (body, records, _) = read_export(&path);
    assert!(body.contains(r#""Queso Manchego ""La Pastora""""#));
    assert_eq!(&records[0][1], r#"Queso Manchego "La Pastora""#);
    assert_eq!(&records[0][0], "12");
    assert_eq!(&records[0][7], "false");

    playground
        .fire(Trigger::EditorCommand("SELECT * FROM customers".into()))
        .await
        .unwrap();
    view.set_search("ALFKI");
    let path = view
        .export(&playground.state().snapshot(), dir.path(), Utc::now())
        .unwrap();

    let (body, records, headers) = read_export(&path);
    let region = headers.iter().position(|h| h == "Region").unwrap();
    assert_eq!(&records[0][region], "");
    assert!(body.contains(r#""Berlin",,"Germany""#));
}

#[tokio::test]
async fn test_export_without_matches_writes_header_only() {
    let (playground, _notifications) = instant_playground().await;
    playground
        .fire(Trigger::EditorCommand("SELECT * FROM employees".into()))
        .await
        .unwrap();

    let mut view = ResultsView::new();
    view.set_search("zzz-no-match");

    let dir = TempDir::new().unwrap();
    let path = view
        .export(&playground.state().snapshot(), dir.path(), Utc::now())
        .unwrap();

    let (body, records, _) = read_export(&path);
    assert!(records.is_empty());
    assert!(body.starts_with("EmployeeID,LastName"));
}

#[tokio::test]
async fn test_export_refused_without_rows() {
    let (playground, _notifications) = instant_playground().await;
    let dir = TempDir::new().unwrap();
    let view = ResultsView::new();

    // Nothing has run yet.
    assert!(view
        .export(&playground.state().snapshot(), dir.path(), Utc::now())
        .is_err());

    // An empty result is refused too.
    playground
        .fire(Trigger::EditorCommand("SELECT * FROM orders LIMIT 0".into()))
        .await
        .unwrap();
    let err = view
        .export(&playground.state().snapshot(), dir.path(), Utc::now())
        .unwrap_err();
    assert_eq!(err.category(), "Export Error");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
