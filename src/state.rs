//! Observable execution state.
//!
//! Every mutation publishes a complete new [`ExecutionState`] on a watch
//! channel, so readers always observe one of the valid shapes. The state is
//! an enum whose variants carry their data: rows exist only in `Succeeded`,
//! an error message only in `Failed`, and `Running` keeps the previously
//! visible rows so renderers do not flash an empty table.

use crate::dataset::{ResultSet, Row};
use crate::error::ErrorKind;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Discrete phase of the execution state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl Phase {
    /// Returns the phase as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the execution state machine.
#[derive(Debug, Clone, Default)]
pub enum ExecutionState {
    /// Nothing has run yet.
    #[default]
    Idle,
    /// A query is in flight; `retained` is what was on screen before it.
    Running { retained: Option<Arc<ResultSet>> },
    /// The last query to land succeeded.
    Succeeded { result: Arc<ResultSet> },
    /// The last query to land failed; earlier rows are kept for inspection.
    Failed {
        kind: ErrorKind,
        message: String,
        retained: Option<Arc<ResultSet>>,
    },
}

impl ExecutionState {
    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Running { .. } => Phase::Running,
            Self::Succeeded { .. } => Phase::Succeeded,
            Self::Failed { .. } => Phase::Failed,
        }
    }

    /// Returns the result of the last query, only when it succeeded.
    pub fn result(&self) -> Option<&Arc<ResultSet>> {
        match self {
            Self::Succeeded { result } => Some(result),
            _ => None,
        }
    }

    /// Returns the result rows, only when the last query succeeded.
    pub fn rows(&self) -> Option<&[Row]> {
        self.result().map(|result| result.rows())
    }

    /// Returns the error message, only when the last query failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns the failure kind, only when the last query failed.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the rows a renderer should show: the current result, or the
    /// one retained across a running or failed query.
    pub fn visible_result(&self) -> Option<&Arc<ResultSet>> {
        match self {
            Self::Idle => None,
            Self::Succeeded { result } => Some(result),
            Self::Running { retained } | Self::Failed { retained, .. } => retained.as_ref(),
        }
    }

    /// Returns true while a query is in flight.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// Owner of the execution state.
///
/// Only the executor mutates it (the transition methods are crate-private);
/// everything else subscribes or takes snapshots.
#[derive(Debug)]
pub struct ExecutionStateStore {
    tx: watch::Sender<ExecutionState>,
}

impl ExecutionStateStore {
    /// Creates a store in the `Idle` phase.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ExecutionState::Idle);
        Self { tx }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> ExecutionState {
        self.tx.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ExecutionState> {
        self.tx.subscribe()
    }

    /// Enters `Running`, clearing any error and keeping the visible rows.
    pub(crate) fn begin(&self) {
        self.tx.send_modify(|state| {
            let retained = state.visible_result().cloned();
            *state = ExecutionState::Running { retained };
        });
        debug!("Execution state -> running");
    }

    /// Lands a successful result.
    pub(crate) fn succeed(&self, result: Arc<ResultSet>) {
        debug!("Execution state -> succeeded ({} rows)", result.row_count());
        self.tx.send_replace(ExecutionState::Succeeded { result });
    }

    /// Lands a failure, keeping whatever rows were visible.
    pub(crate) fn fail(&self, kind: ErrorKind, message: impl Into<String>) {
        let message = message.into();
        debug!("Execution state -> failed ({})", message);
        self.tx.send_modify(|state| {
            let retained = state.visible_result().cloned();
            *state = ExecutionState::Failed {
                kind,
                message,
                retained,
            };
        });
    }
}

impl Default for ExecutionStateStore {
    fn default() -> Self {
        Self::new()
    }
}
