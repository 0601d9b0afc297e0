//! Overlapping executions under both run policies.
//!
//! Uses tokio's paused clock, so the simulated latencies decide completion
//! order deterministically.

use db_playground::config::Config;
use db_playground::dataset::TableName;
use db_playground::notify::NotificationLevel;
use db_playground::query::RunPolicy;
use db_playground::session::Playground;
use db_playground::state::Phase;
use db_playground::trigger::Trigger;

/// Products take 300 ms, orders 10 ms, everything else 50 ms.
fn config(policy: RunPolicy) -> Config {
    let mut config = Config::default();
    config.execution.latency_ms = 50;
    config.execution.policy = policy;
    config
        .execution
        .table_latency_ms
        .insert(TableName::Products, 300);
    config
        .execution
        .table_latency_ms
        .insert(TableName::Orders, 10);
    config
}

#[tokio::test(start_paused = true)]
async fn test_running_phase_is_observable() {
    let (playground, _notifications) = Playground::start(&config(RunPolicy::default()))
        .await
        .unwrap();
    let mut state_rx = playground.state().subscribe();

    let handle = playground.fire(Trigger::EditorCommand("SELECT * FROM customers".into()));

    let running = state_rx.wait_for(|state| state.is_running()).await.unwrap();
    assert!(running.rows().is_none());
    assert!(running.error_message().is_none());
    drop(running);

    handle.await.unwrap();
    assert_eq!(playground.state().snapshot().phase(), Phase::Succeeded);
}

#[tokio::test(start_paused = true)]
async fn test_last_write_wins_keeps_the_slower_query() {
    let (playground, mut notifications) = Playground::start(&config(RunPolicy::LastWriteWins))
        .await
        .unwrap();

    let slow = playground.fire(Trigger::EditorCommand("SELECT * FROM products".into()));
    let fast = playground.fire(Trigger::EditorCommand("SELECT * FROM orders".into()));

    let fast = fast.await.unwrap();
    let slow = slow.await.unwrap();
    assert!(fast.succeeded());
    assert!(slow.succeeded());
    assert!(slow.generation < fast.generation);

    // The orders result landed first and was then overwritten.
    let state = playground.state().snapshot();
    assert_eq!(state.result().unwrap().table(), TableName::Products);

    for _ in 0..2 {
        let notification = notifications.recv().await.unwrap();
        assert_eq!(notification.level, NotificationLevel::Success);
    }
    assert!(notifications.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_single_flight_discards_superseded_result() {
    let (playground, mut notifications) = Playground::start(&config(RunPolicy::SingleFlight))
        .await
        .unwrap();

    let slow = playground.fire(Trigger::EditorCommand("SELECT * FROM products".into()));
    let fast = playground.fire(Trigger::EditorCommand("SELECT * FROM orders".into()));

    let fast = fast.await.unwrap();
    let slow = slow.await.unwrap();
    assert!(fast.succeeded());
    assert!(slow.superseded);
    assert!(!slow.succeeded());

    let state = playground.state().snapshot();
    assert_eq!(state.phase(), Phase::Succeeded);
    assert_eq!(state.result().unwrap().table(), TableName::Orders);

    notifications.recv().await.unwrap();
    assert!(notifications.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_single_flight_stale_failure_is_discarded_too() {
    let (playground, _notifications) = Playground::start(&config(RunPolicy::SingleFlight))
        .await
        .unwrap();

    // Unknown tables use the default 50 ms, which is slower than orders.
    let stale = playground.fire(Trigger::EditorCommand("SELECT * FROM invoices".into()));
    let latest = playground.fire(Trigger::EditorCommand("SELECT * FROM orders".into()));

    latest.await.unwrap();
    assert!(stale.await.unwrap().superseded);
    assert_eq!(playground.state().snapshot().phase(), Phase::Succeeded);
}

#[tokio::test(start_paused = true)]
async fn test_every_trigger_starts_an_independent_execution() {
    let (playground, _notifications) = Playground::start(&config(RunPolicy::LastWriteWins))
        .await
        .unwrap();
    playground.query().replace("SELECT * FROM employees");

    let handles = vec![
        playground.fire(Trigger::RunButton),
        playground.fire(Trigger::Accelerator),
        playground.fire(Trigger::EditorCommand("SELECT * FROM employees".into())),
    ];

    let mut generations = Vec::new();
    for handle in handles {
        let outcome = handle.await.unwrap();
        assert!(outcome.succeeded());
        generations.push(outcome.generation);
    }
    generations.sort_unstable();
    assert_eq!(generations, vec![1, 2, 3]);
}
