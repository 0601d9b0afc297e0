//! Dataset sources.
//!
//! `EmbeddedSource` serves the sample tables compiled into the binary;
//! `DirectorySource` reads `<table>.json` files from a directory.

use super::{Dataset, DatasetSource, TableName};
use crate::error::{PlaygroundError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

const PRODUCTS_JSON: &str = include_str!("../../data/products.json");
const CUSTOMERS_JSON: &str = include_str!("../../data/customers.json");
const ORDERS_JSON: &str = include_str!("../../data/orders.json");
const EMPLOYEES_JSON: &str = include_str!("../../data/employees.json");

/// The sample tables bundled with the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

#[async_trait]
impl DatasetSource for EmbeddedSource {
    async fn fetch(&self, table: TableName) -> Result<Dataset> {
        let json = match table {
            TableName::Products => PRODUCTS_JSON,
            TableName::Customers => CUSTOMERS_JSON,
            TableName::Orders => ORDERS_JSON,
            TableName::Employees => EMPLOYEES_JSON,
        };
        Dataset::from_json_str(json)
            .map_err(|e| PlaygroundError::dataset(format!("{}: {e}", table.file_name())))
    }

    fn describe(&self) -> String {
        "built-in sample data".to_string()
    }
}

/// Reads tables from JSON files in a directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Creates a source reading from the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory tables are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DatasetSource for DirectorySource {
    async fn fetch(&self, table: TableName) -> Result<Dataset> {
        let path = self.dir.join(table.file_name());
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            PlaygroundError::dataset(format!("Failed to read {}: {e}", path.display()))
        })?;

        Dataset::from_json_str(&content)
            .map_err(|e| PlaygroundError::dataset(format!("{}: {e}", path.display())))
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
