//! Query execution against the dataset store.
//!
//! Drives the execution state through `Running` into a terminal phase for
//! every call. The lookup itself is in-memory; a configurable delay stands in
//! for an out-of-process data source, so overlapping calls interleave the
//! way they would against a real backend.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::buffer::QueryBuffer;
use super::parser::{self, ParsedQuery};
use crate::dataset::{DatasetStore, ResultSet, TableName};
use crate::error::{ErrorKind, PlaygroundError, Result};
use crate::state::ExecutionStateStore;

/// How overlapping executions write the shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RunPolicy {
    /// Every execution lands; whichever completes last is what readers see.
    #[default]
    LastWriteWins,
    /// Only the most recently started execution lands; older completions
    /// are discarded.
    SingleFlight,
}

impl fmt::Display for RunPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LastWriteWins => "last-write-wins",
            Self::SingleFlight => "single-flight",
        })
    }
}

/// Simulated resolution delay, with optional per-table overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatencyModel {
    default: Duration,
    per_table: HashMap<TableName, Duration>,
}

impl LatencyModel {
    /// Creates a model with the same delay for every table.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            default: delay,
            per_table: HashMap::new(),
        }
    }

    /// Overrides the delay for one table.
    pub fn with_table(mut self, table: TableName, delay: Duration) -> Self {
        self.per_table.insert(table, delay);
        self
    }

    /// Returns the delay for a table (the default when the table is unknown).
    pub fn delay_for(&self, table: Option<TableName>) -> Duration {
        table
            .and_then(|table| self.per_table.get(&table).copied())
            .unwrap_or(self.default)
    }
}

/// Result of one execution.
#[derive(Debug, Clone)]
pub enum ExecutionResult {
    /// The query resolved to rows.
    Success(Arc<ResultSet>),
    /// The query could not be resolved.
    Failure { kind: ErrorKind, message: String },
}

impl ExecutionResult {
    /// Returns true for `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// What the caller of [`QueryExecutor::execute`] gets back.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// Sequence number of this execution (1-based, in start order).
    pub generation: u64,
    /// The execution's own result, whether or not it reached the state.
    pub result: ExecutionResult,
    /// True when a newer execution started first and this result was
    /// discarded (single-flight only).
    pub superseded: bool,
}

impl ExecutionOutcome {
    /// Returns true if the query succeeded and its result was published.
    pub fn succeeded(&self) -> bool {
        !self.superseded && self.result.is_success()
    }
}

/// Resolves a query string against the store without touching any state.
pub fn resolve(store: &DatasetStore, sql: &str) -> Result<ResultSet> {
    let parsed = parser::parse(sql)?;
    resolve_parsed(store, &parsed)
}

fn resolve_parsed(store: &DatasetStore, parsed: &ParsedQuery) -> Result<ResultSet> {
    let table = TableName::from_identifier(&parsed.table)
        .ok_or_else(|| PlaygroundError::table_not_found(&parsed.table))?;

    Ok(ResultSet::new(table, store.get(table), parsed.limit))
}

/// Runs queries and publishes their outcome to the execution state.
pub struct QueryExecutor {
    store: Arc<DatasetStore>,
    state: Arc<ExecutionStateStore>,
    query: Arc<QueryBuffer>,
    latency: LatencyModel,
    policy: RunPolicy,
    generation: AtomicU64,
}

impl QueryExecutor {
    /// Creates a new query executor.
    pub fn new(
        store: Arc<DatasetStore>,
        state: Arc<ExecutionStateStore>,
        query: Arc<QueryBuffer>,
        latency: LatencyModel,
        policy: RunPolicy,
    ) -> Self {
        Self {
            store,
            state,
            query,
            latency,
            policy,
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the overlap policy in force.
    pub fn policy(&self) -> RunPolicy {
        self.policy
    }

    /// Executes `sql`, or the shared query text when `sql` is `None`.
    ///
    /// Always passes through `Running`. Failures never escape: they land in
    /// the state as `Failed` and come back in the outcome.
    pub async fn execute(&self, sql: Option<String>) -> ExecutionOutcome {
        let sql = sql.unwrap_or_else(|| self.query.text());
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let start = Instant::now();

        self.state.begin();

        let parsed = parser::parse(&sql);
        let table = parsed
            .as_ref()
            .ok()
            .and_then(|p| TableName::from_identifier(&p.table));

        let delay = self.latency.delay_for(table);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let resolved = parsed.and_then(|parsed| resolve_parsed(&self.store, &parsed));
        let execution_time = start.elapsed();

        if self.policy == RunPolicy::SingleFlight
            && self.generation.load(Ordering::SeqCst) != generation
        {
            debug!("Discarding result of superseded execution #{}", generation);
            return ExecutionOutcome {
                generation,
                result: Self::to_result(resolved, execution_time),
                superseded: true,
            };
        }

        let result = Self::to_result(resolved, execution_time);
        match &result {
            ExecutionResult::Success(result_set) => {
                info!(
                    "Query #{} on {} returned {} rows in {}ms",
                    generation,
                    result_set.table(),
                    result_set.row_count(),
                    execution_time.as_millis()
                );
                self.state.succeed(Arc::clone(result_set));
            }
            ExecutionResult::Failure { kind, message } => {
                warn!("Query #{} failed: {}", generation, message);
                self.state.fail(*kind, message.clone());
            }
        }

        ExecutionOutcome {
            generation,
            result,
            superseded: false,
        }
    }

    fn to_result(resolved: Result<ResultSet>, execution_time: Duration) -> ExecutionResult {
        match resolved {
            Ok(result_set) => {
                ExecutionResult::Success(Arc::new(result_set.with_execution_time(execution_time)))
            }
            Err(e) => ExecutionResult::Failure {
                kind: e.kind().unwrap_or(ErrorKind::DatasetLoadFailure),
                message: e.to_string(),
            },
        }
    }
}
