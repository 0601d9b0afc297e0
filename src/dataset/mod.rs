//! Dataset store for the playground.
//!
//! Holds the four fixed sample tables. A [`DatasetSource`] supplies them once
//! at startup; after that the store is immutable and shared behind an `Arc`.

mod source;
mod types;

pub use source::{DirectorySource, EmbeddedSource};
pub use types::{Dataset, ResultSet, Row, Value};

use crate::error::Result;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// The fixed set of tables a query can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableName {
    Products,
    Customers,
    Orders,
    Employees,
}

impl TableName {
    /// All tables, in load order.
    pub const ALL: [TableName; 4] = [
        TableName::Products,
        TableName::Customers,
        TableName::Orders,
        TableName::Employees,
    ];

    /// Returns the table identifier as written in queries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Customers => "customers",
            Self::Orders => "orders",
            Self::Employees => "employees",
        }
    }

    /// Resolves a query token to a table. Matching is exact and case-sensitive.
    pub fn from_identifier(ident: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|table| table.as_str() == ident)
    }

    /// Returns the file name the table is stored under.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }

    fn index(self) -> usize {
        match self {
            Self::Products => 0,
            Self::Customers => 1,
            Self::Orders => 2,
            Self::Employees => 3,
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait defining where the sample tables come from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetches and decodes one table.
    async fn fetch(&self, table: TableName) -> Result<Dataset>;

    /// Returns a short description of the source for display.
    fn describe(&self) -> String;
}

/// Read-only collection of the four tables.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    tables: [Arc<Dataset>; 4],
}

impl DatasetStore {
    /// Creates a store where every table is empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a store from explicit tables; tables not given stay empty.
    pub fn from_tables(tables: impl IntoIterator<Item = (TableName, Dataset)>) -> Self {
        let mut store = Self::empty();
        for (name, dataset) in tables {
            store.tables[name.index()] = Arc::new(dataset);
        }
        store
    }

    /// Loads every table from the source concurrently.
    ///
    /// A table that fails to load is logged and left empty; loading never
    /// fails as a whole.
    pub async fn load(source: &dyn DatasetSource) -> Self {
        let fetches = TableName::ALL.map(|table| async move { (table, source.fetch(table).await) });

        let mut store = Self::empty();
        for (table, result) in join_all(fetches).await {
            match result {
                Ok(dataset) => {
                    info!("Loaded {} ({} rows) from {}", table, dataset.len(), source.describe());
                    store.tables[table.index()] = Arc::new(dataset);
                }
                Err(e) => {
                    warn!("Failed to load {}: {}", table, e);
                }
            }
        }
        store
    }

    /// Returns a shared handle to a table.
    pub fn get(&self, table: TableName) -> Arc<Dataset> {
        Arc::clone(&self.tables[table.index()])
    }

    /// Returns the row count of every table, in load order.
    pub fn summary(&self) -> Vec<(TableName, usize)> {
        TableName::ALL
            .into_iter()
            .map(|table| (table, self.tables[table.index()].len()))
            .collect()
    }
}
