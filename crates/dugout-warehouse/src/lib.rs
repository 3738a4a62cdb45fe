//! Embedded `DuckDB` landing zone for raw MLB extracts.
//!
//! Every raw table lives in the `raw_mlb` schema. Loads go through
//! [`loader::load_rows`], which upserts keyed tables and appends to the
//! pitch-level table.

pub mod duckdb;
pub mod loader;
pub mod migrations;
pub mod row;

use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::Connection;
use thiserror::Error;

pub use duckdb::{DatabaseLocation, DuckDbConnectionManager, StepConnection};
pub use loader::{append_rows, load_rows, upsert_rows, ConflictKey, TableSpec};
pub use row::{Row, Value};

/// Schema holding every raw table.
pub const RAW_SCHEMA: &str = "raw_mlb";

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid batch: {0}")]
    InvalidBatch(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    pub location: DatabaseLocation,
}

impl WarehouseConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: DatabaseLocation::File(path.into()),
        }
    }

    pub const fn in_memory() -> Self {
        Self {
            location: DatabaseLocation::InMemory,
        }
    }
}

pub struct Warehouse {
    manager: DuckDbConnectionManager,
}

impl Warehouse {
    /// Open the database and bring its schema up to date.
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if let DatabaseLocation::File(path) = &config.location {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = DuckDbConnectionManager::open(config.location)?;
        let warehouse = Self { manager };
        warehouse.initialize()?;
        tracing::info!(
            path = ?warehouse.db_path(),
            "warehouse ready"
        );
        Ok(warehouse)
    }

    pub fn open_in_memory() -> Result<Self, WarehouseError> {
        Self::open(WarehouseConfig::in_memory())
    }

    pub fn initialize(&self) -> Result<(), WarehouseError> {
        migrations::apply_migrations(self.manager.root())?;
        Ok(())
    }

    /// Exclusive connection for one unit of work, released on drop.
    pub fn connect(&self, label: &str) -> Result<StepConnection, WarehouseError> {
        Ok(self.manager.acquire(label)?)
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.manager.db_path()
    }

    pub fn count_rows(&self, table: &str) -> Result<i64, WarehouseError> {
        let sql = format!("SELECT COUNT(*) FROM {}", loader::quote_qualified(table));
        Ok(self.manager.root().query_row(&sql, [], |row| row.get(0))?)
    }
}

fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, WarehouseError>,
) -> Result<T, WarehouseError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}
