//! Headless mode tests driving the real binary.

use super::common::run_headless;

#[test]
fn test_headless_basic() {
    let (code, stdout, stderr) = run_headless(&["--events", "key:esc"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Events: 1 executed"));
    assert!(stdout.contains("DB Playground"));
}

#[test]
fn test_headless_runs_query_and_reports_state() {
    let (code, stdout, stderr) = run_headless(&[
        "--events",
        "type:SELECT * FROM products,key:ctrl+enter,settle,assert:state:row_count=12",
        "--output",
        "json",
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["state"]["phase"], "succeeded");
    assert_eq!(parsed["state"]["row_count"], 12);
    assert_eq!(parsed["state"]["query"], "SELECT * FROM products");
    assert_eq!(parsed["assertions"]["passed"], 1);
    assert_eq!(parsed["assertions"]["failed"], 0);
}

#[test]
fn test_headless_failing_assertion_exits_nonzero() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "type:SELECT * FROM invoices,key:f5,settle,assert:state:phase=succeeded",
    ]);
    assert_eq!(code, 1);
    assert!(stdout.contains("Assertions: 0 passed, 1 failed"));
    assert!(stdout.contains("FAILED:"));
}

#[test]
fn test_headless_error_shows_on_screen() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "type:SELECT 1,key:f5,settle,assert:contains:No table specified in query",
    ]);
    assert_eq!(code, 0, "stdout: {}", stdout);
}

#[test]
fn test_headless_template_then_run() {
    let (code, stdout, stderr) = run_headless(&[
        "--events",
        "template:Recent Orders,key:f5,settle,assert:state:row_count=12,assert:contains:Ship Country",
    ]);
    assert_eq!(code, 0, "stderr: {}\nstdout: {}", stderr, stdout);
    assert!(stdout.contains("Assertions: 2 passed, 0 failed"));
}

#[test]
fn test_headless_search_narrows_rows() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "type:SELECT * FROM customers,key:f5,settle,search:mexico,assert:state:filtered_count=2,assert:state:visible_count=8",
    ]);
    assert_eq!(code, 0, "stdout: {}", stdout);
}

#[test]
fn test_headless_invalid_event() {
    let (code, _, stderr) = run_headless(&["--events", "invalid:event"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Configuration Error"));
}

#[test]
fn test_headless_requires_events() {
    let (code, _, stderr) = run_headless(&[]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--headless requires --events or --script"));
}
