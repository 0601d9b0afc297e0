//! End-to-end tests for parse, resolve and state publication.

use super::instant_playground;
use db_playground::config::Config;
use db_playground::dataset::{DatasetStore, DirectorySource, EmbeddedSource, TableName, Value};
use db_playground::error::ErrorKind;
use db_playground::notify::NotificationLevel;
use db_playground::query::resolve;
use db_playground::results::ResultsView;
use db_playground::session::Playground;
use db_playground::state::Phase;
use db_playground::trigger::Trigger;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[tokio::test]
async fn test_bundled_tables_load() {
    let store = DatasetStore::load(&EmbeddedSource).await;
    let summary = store.summary();

    assert_eq!(
        summary,
        vec![
            (TableName::Products, 12),
            (TableName::Customers, 8),
            (TableName::Orders, 12),
            (TableName::Employees, 6),
        ]
    );
    assert_eq!(store.get(TableName::Products).columns()[0], "ProductID");
}

#[tokio::test]
async fn test_select_all_products() {
    let (playground, mut notifications) = instant_playground().await;

    let outcome = playground
        .fire(Trigger::EditorCommand("SELECT * FROM products;".into()))
        .await
        .unwrap();
    assert!(outcome.succeeded());

    let state = playground.state().snapshot();
    assert_eq!(state.phase(), Phase::Succeeded);
    let rows = state.rows().unwrap();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0][1], Value::from("Chai"));

    let notification = notifications.recv().await.unwrap();
    assert_eq!(notification.level, NotificationLevel::Success);
    assert_eq!(notification.title, "Query Executed");
}

#[tokio::test]
async fn test_keywords_and_table_are_case_insensitive() {
    let store = DatasetStore::load(&EmbeddedSource).await;

    let result = resolve(&store, "select ProductName from PRODUCTS limit 3").unwrap();
    assert_eq!(result.table(), TableName::Products);
    assert_eq!(result.row_count(), 3);

    // Only the table and limit matter; the projection is ignored.
    assert_eq!(result.columns().len(), 8);
}

#[tokio::test]
async fn test_limit_edge_cases() {
    let store = DatasetStore::load(&EmbeddedSource).await;

    assert_eq!(resolve(&store, "SELECT * FROM orders LIMIT 0").unwrap().row_count(), 0);
    assert_eq!(resolve(&store, "SELECT * FROM orders LIMIT 500").unwrap().row_count(), 12);
    assert_eq!(resolve(&store, "SELECT * FROM orders LIMIT ten").unwrap().row_count(), 12);
}

#[tokio::test]
async fn test_unknown_table_fails_with_message() {
    let (playground, mut notifications) = instant_playground().await;

    let outcome = playground
        .fire(Trigger::EditorCommand("SELECT * FROM invoices".into()))
        .await
        .unwrap();
    assert!(!outcome.succeeded());

    let state = playground.state().snapshot();
    assert_eq!(state.phase(), Phase::Failed);
    assert_eq!(state.error_kind(), Some(ErrorKind::TableNotFound));
    assert_eq!(state.error_message(), Some("Table 'invoices' not found"));
    assert!(state.rows().is_none());

    let notification = notifications.recv().await.unwrap();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert_eq!(notification.title, "Query Error");
}

#[tokio::test]
async fn test_missing_from_clause() {
    let (playground, _notifications) = instant_playground().await;

    playground
        .fire(Trigger::EditorCommand("SELECT 1 + 1".into()))
        .await
        .unwrap();

    let state = playground.state().snapshot();
    assert_eq!(state.error_kind(), Some(ErrorKind::NoTableSpecified));
    assert_eq!(state.error_message(), Some("No table specified in query"));
}

#[tokio::test]
async fn test_failure_keeps_previous_rows_visible() {
    let (playground, _notifications) = instant_playground().await;

    playground
        .fire(Trigger::EditorCommand("SELECT * FROM employees".into()))
        .await
        .unwrap();
    playground
        .fire(Trigger::EditorCommand("SELECT * FROM nowhere".into()))
        .await
        .unwrap();

    let state = playground.state().snapshot();
    assert_eq!(state.phase(), Phase::Failed);
    assert_eq!(state.visible_result().unwrap().row_count(), 6);
}

#[tokio::test]
async fn test_run_button_and_accelerator_read_shared_query() {
    let (playground, _notifications) = instant_playground().await;

    playground.query().replace("SELECT * FROM customers LIMIT 2");
    playground.fire(Trigger::RunButton).await.unwrap();
    assert_eq!(playground.state().snapshot().rows().unwrap().len(), 2);

    playground.query().replace("SELECT * FROM customers");
    playground.fire(Trigger::Accelerator).await.unwrap();
    assert_eq!(playground.state().snapshot().rows().unwrap().len(), 8);
}

#[tokio::test]
async fn test_search_survives_new_execution() {
    let (playground, _notifications) = instant_playground().await;
    let mut view = ResultsView::new();
    view.set_search("mexico");

    playground
        .fire(Trigger::EditorCommand("SELECT * FROM customers".into()))
        .await
        .unwrap();
    assert_eq!(view.filtered(&playground.state().snapshot()).len(), 2);

    playground
        .fire(Trigger::EditorCommand("SELECT * FROM orders".into()))
        .await
        .unwrap();
    assert_eq!(view.search(), "mexico");
    // Order 10259 ships to Mexico.
    assert_eq!(view.filtered(&playground.state().snapshot()).len(), 1);
}

#[tokio::test]
async fn test_headers_are_humanized_for_display() {
    let (playground, _notifications) = instant_playground().await;
    playground
        .fire(Trigger::EditorCommand("SELECT * FROM orders".into()))
        .await
        .unwrap();

    let headers = ResultsView::new().headers(&playground.state().snapshot());
    assert_eq!(
        headers,
        vec![
            "Order ID",
            "Customer ID",
            "Employee ID",
            "Order Date",
            "Shipped Date",
            "Freight",
            "Ship City",
            "Ship Country",
        ]
    );
}

#[tokio::test]
async fn test_directory_source_with_missing_and_broken_tables() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("products.json"),
        r#"[{"ProductID": 1, "ProductName": "Tofu"}]"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("orders.json"), "not json").unwrap();

    let store = DatasetStore::load(&DirectorySource::new(dir.path())).await;
    assert_eq!(store.get(TableName::Products).len(), 1);
    assert!(store.get(TableName::Orders).is_empty());
    assert!(store.get(TableName::Customers).is_empty());

    // A table that failed to load answers with zero rows.
    let result = resolve(&store, "SELECT * FROM orders").unwrap();
    assert_eq!(result.row_count(), 0);
}

#[tokio::test]
async fn test_session_reads_data_dir_from_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("employees.json"),
        r#"[{"EmployeeID": 1, "LastName": "Davolio"}, {"EmployeeID": 2, "LastName": "Fuller"}]"#,
    )
    .unwrap();

    let mut config = Config::default();
    config.data.dir = Some(dir.path().to_path_buf());
    config.execution.latency_ms = 0;

    let (playground, _notifications) = Playground::start(&config).await.unwrap();
    assert_eq!(playground.store().get(TableName::Employees).len(), 2);
    assert!(playground.store().get(TableName::Products).is_empty());
}
