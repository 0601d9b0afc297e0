//! Execution triggers.
//!
//! The run button, the global accelerator and the editor's own run command
//! all funnel into [`TriggerCoordinator::fire`], which starts an independent
//! execution task and posts a notification once it lands. Tasks are never
//! cancelled; how overlapping runs resolve is the executor's policy.

pub mod keymap;

pub use keymap::{action_for, KeyAction};

use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::notify::{Notification, Notifier};
use crate::query::{ExecutionOutcome, QueryExecutor};

/// Where an execution request came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The run button; executes the shared query text.
    RunButton,
    /// The global accelerator; executes the shared query text.
    Accelerator,
    /// The editor's own command; carries the editor buffer at the time of the
    /// keystroke.
    EditorCommand(String),
}

impl Trigger {
    /// Returns the explicit query text, if the trigger carries one.
    pub fn into_sql(self) -> Option<String> {
        match self {
            Self::RunButton | Self::Accelerator => None,
            Self::EditorCommand(sql) => Some(sql),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::RunButton => "run button",
            Self::Accelerator => "accelerator",
            Self::EditorCommand(_) => "editor command",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single entry point shared by every trigger.
#[derive(Clone)]
pub struct TriggerCoordinator {
    executor: Arc<QueryExecutor>,
    notifier: Notifier,
}

impl TriggerCoordinator {
    /// Creates a coordinator over an executor.
    pub fn new(executor: Arc<QueryExecutor>, notifier: Notifier) -> Self {
        Self { executor, notifier }
    }

    /// Starts an execution task for the trigger.
    ///
    /// Must be called from within a tokio runtime. The returned handle
    /// resolves to the outcome; dropping it does not cancel the task.
    pub fn fire(&self, trigger: Trigger) -> JoinHandle<ExecutionOutcome> {
        debug!("Execution triggered by {}", trigger);

        let executor = Arc::clone(&self.executor);
        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            let outcome = executor.execute(trigger.into_sql()).await;

            if !outcome.superseded {
                let notification = if outcome.result.is_success() {
                    Notification::query_succeeded()
                } else {
                    Notification::query_failed()
                };
                notifier.notify(notification);
            }

            outcome
        })
    }
}
