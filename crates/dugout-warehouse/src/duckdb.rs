//! `DuckDB` connection handling.
//!
//! The warehouse owns one database instance; each extraction step borrows an
//! exclusive [`StepConnection`] cloned from it. The handle is released when it
//! goes out of scope, whether the step body returned normally or bailed out
//! with an error.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use ::duckdb::Connection;

/// Where the embedded database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

/// Root handle to the database instance.
pub struct DuckDbConnectionManager {
    location: DatabaseLocation,
    root: Connection,
}

impl DuckDbConnectionManager {
    /// Open (or create) the database at `location`.
    ///
    /// # Errors
    /// Returns an error if the database file cannot be opened or configured.
    pub fn open(location: DatabaseLocation) -> Result<Self, ::duckdb::Error> {
        let root = match &location {
            DatabaseLocation::File(path) => Connection::open(path)?,
            DatabaseLocation::InMemory => Connection::open_in_memory()?,
        };
        configure_connection(&root)?;
        Ok(Self { location, root })
    }

    /// Acquire an exclusive connection for one step.
    ///
    /// # Errors
    /// Returns an error if the database refuses a new connection.
    pub fn acquire(&self, label: &str) -> Result<StepConnection, ::duckdb::Error> {
        let connection = self.root.try_clone()?;
        configure_connection(&connection)?;
        tracing::debug!(owner = label, "warehouse connection acquired");
        Ok(StepConnection {
            label: label.to_owned(),
            connection,
        })
    }

    pub fn root(&self) -> &Connection {
        &self.root
    }

    /// Path of the database file, `None` for in-memory databases.
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        match &self.location {
            DatabaseLocation::File(path) => Some(path.as_path()),
            DatabaseLocation::InMemory => None,
        }
    }
}

/// Connection scoped to a single step; closed on drop.
pub struct StepConnection {
    label: String,
    connection: Connection,
}

impl Deref for StepConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}

impl Drop for StepConnection {
    fn drop(&mut self) {
        tracing::debug!(owner = self.label.as_str(), "warehouse connection released");
    }
}

/// Configure a database connection with appropriate settings.
///
/// # Errors
/// Returns an error if configuration SQL fails to execute.
fn configure_connection(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch("PRAGMA disable_progress_bar;")
}
