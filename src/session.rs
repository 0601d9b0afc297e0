//! A running playground session.
//!
//! Owns the shared pieces of the pipeline (dataset store, query text,
//! execution state, executor, trigger coordinator) and hands out handles to
//! them. Front ends (the interactive TUI, the headless runner, tests) build
//! one `Playground` and drive it through its triggers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::dataset::{DatasetSource, DatasetStore, DirectorySource, EmbeddedSource};
use crate::error::Result;
use crate::notify::{self, Notification, Notifier};
use crate::query::{ExecutionOutcome, QueryBuffer, QueryExecutor, RunPolicy};
use crate::state::ExecutionStateStore;
use crate::trigger::{Trigger, TriggerCoordinator};

/// Shared handles for one session.
#[derive(Clone)]
pub struct Playground {
    store: Arc<DatasetStore>,
    state: Arc<ExecutionStateStore>,
    query: Arc<QueryBuffer>,
    coordinator: TriggerCoordinator,
    notifier: Notifier,
    policy: RunPolicy,
    export_dir: PathBuf,
    source: String,
}

impl Playground {
    /// Loads the datasets named by the config and wires up a session.
    ///
    /// Returns the session together with the receiving end of its
    /// notification channel.
    pub async fn start(config: &Config) -> Result<(Self, mpsc::UnboundedReceiver<Notification>)> {
        let source: Box<dyn DatasetSource> = match &config.data.dir {
            Some(dir) => Box::new(DirectorySource::new(dir)),
            None => Box::new(EmbeddedSource),
        };

        info!("Loading datasets from {}", source.describe());
        let store = DatasetStore::load(source.as_ref()).await;

        let (notifier, rx) = notify::channel();
        let playground = Self::with_store(store, config, notifier).described_as(source.describe());
        Ok((playground, rx))
    }

    /// Wires up a session over an already loaded store.
    pub fn with_store(store: DatasetStore, config: &Config, notifier: Notifier) -> Self {
        let latency = config.execution.latency_model();
        let policy = config.execution.policy;

        let store = Arc::new(store);
        let state = Arc::new(ExecutionStateStore::new());
        let query = Arc::new(QueryBuffer::default());
        let executor = Arc::new(QueryExecutor::new(
            Arc::clone(&store),
            Arc::clone(&state),
            Arc::clone(&query),
            latency,
            policy,
        ));
        let coordinator = TriggerCoordinator::new(executor, notifier.clone());

        Self {
            store,
            state,
            query,
            coordinator,
            notifier,
            policy,
            export_dir: config.export.dir.clone(),
            source: "in-memory tables".to_string(),
        }
    }

    fn described_as(mut self, source: String) -> Self {
        self.source = source;
        self
    }

    /// Starts an execution for the trigger.
    pub fn fire(&self, trigger: Trigger) -> JoinHandle<ExecutionOutcome> {
        self.coordinator.fire(trigger)
    }

    /// Returns the dataset store.
    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }

    /// Returns the execution state.
    pub fn state(&self) -> &Arc<ExecutionStateStore> {
        &self.state
    }

    /// Returns the shared query text.
    pub fn query(&self) -> &Arc<QueryBuffer> {
        &self.query
    }

    /// Returns a handle for posting notifications.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Returns the overlap policy in force.
    pub fn policy(&self) -> RunPolicy {
        self.policy
    }

    /// Returns the directory exports are written to.
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Returns a description of where the datasets came from.
    pub fn source(&self) -> &str {
        &self.source
    }
}
