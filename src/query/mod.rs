//! Query parsing and execution.
//!
//! This module isolates the query pipeline (parse, resolve, publish) from the
//! triggers and views that drive it.

pub mod buffer;
pub mod executor;
pub mod parser;

pub use buffer::{format_sql, toggle_comment, QueryBuffer};
pub use executor::{
    resolve, ExecutionOutcome, ExecutionResult, LatencyModel, QueryExecutor, RunPolicy,
};
pub use parser::{parse, ParsedQuery};
