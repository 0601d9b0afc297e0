//! DB Playground - a terminal SQL playground over in-memory sample tables.
//!
//! This library exposes the core modules for the binary and for integration
//! tests.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod notify;
pub mod query;
pub mod results;
pub mod session;
pub mod state;
pub mod templates;
pub mod trigger;
pub mod tui;
