//! Library-level integration tests.

pub mod concurrency_test;
pub mod export_test;
pub mod pipeline_test;

use db_playground::config::Config;
use db_playground::notify::Notification;
use db_playground::session::Playground;
use tokio::sync::mpsc;

/// Starts a session over the bundled data with no simulated latency.
pub async fn instant_playground() -> (Playground, mpsc::UnboundedReceiver<Notification>) {
    let mut config = Config::default();
    config.execution.latency_ms = 0;
    Playground::start(&config).await.unwrap()
}
