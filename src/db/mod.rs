//! Database Module
//!
//! SQLite record store: one `App` table of credential records.

pub mod connection;
pub mod models;
pub mod queries;
pub mod schema;

use std::path::PathBuf;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not open store at {}: {source}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Store read failed: {0}")]
    Read(#[source] rusqlite::Error),

    #[error("Store write failed: {0}")]
    Write(#[source] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Record id prefix '{0}' matches more than one record")]
    AmbiguousId(String),
}

impl StoreError {
    pub fn read(e: rusqlite::Error) -> Self {
        Self::Read(e)
    }

    pub fn write(e: rusqlite::Error) -> Self {
        Self::Write(e)
    }

    /// Reads made on behalf of a write count as write failures
    pub fn into_write(self) -> Self {
        match self {
            Self::Read(e) => Self::Write(e),
            other => other,
        }
    }

    /// True for errors that mean the store itself is unusable
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// Re-exports
pub use connection::{Database, DatabaseConfig};
pub use models::{Record, RecordId};
pub use queries::*;
