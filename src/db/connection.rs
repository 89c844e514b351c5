//! Database Connection Management
//!
//! Opens SQLite connections for the record store: one read-write
//! connection that owns the schema, and optional query-only readers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use super::{schema::init_schema, StoreError, StoreResult};

const MEMORY_PATH: &str = ":memory:";

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file
    pub path: PathBuf,
    /// Enable WAL mode so readers don't block on the writer
    pub wal_mode: bool,
    /// How long a statement waits on a locked database before failing
    pub busy_timeout: Duration,
    /// Number of read-only connections kept next to the writer
    pub readers: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: crate::config::default_data_dir().join("vault.db"),
            wal_mode: true,
            busy_timeout: Duration::from_secs(5),
            readers: 4,
        }
    }
}

impl DatabaseConfig {
    /// Create config for in-memory database (testing)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(MEMORY_PATH),
            wal_mode: false,
            readers: 0,
            ..Default::default()
        }
    }

    /// Create config for a specific path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.to_str() == Some(MEMORY_PATH)
    }
}

/// Database wrapper with connection management
pub struct Database {
    conn: Connection,
    config: DatabaseConfig,
}

impl Database {
    /// Open or create the read-write database and initialize its schema
    pub fn open(config: DatabaseConfig) -> StoreResult<Self> {
        let conn = Self::connect(&config, false).map_err(|source| StoreError::Connection {
            path: config.path.clone(),
            source,
        })?;

        Ok(Self { conn, config })
    }

    /// Open a query-only connection to an existing database file
    pub fn open_reader(config: DatabaseConfig) -> StoreResult<Self> {
        let conn = Self::connect(&config, true).map_err(|source| StoreError::Connection {
            path: config.path.clone(),
            source,
        })?;

        Ok(Self { conn, config })
    }

    /// Open in-memory database for testing
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(DatabaseConfig::in_memory())
    }

    fn connect(config: &DatabaseConfig, reader: bool) -> rusqlite::Result<Connection> {
        if config.is_in_memory() {
            let conn = Connection::open_in_memory()?;
            init_schema(&conn)?;
            return Ok(conn);
        }

        // Create parent directory if needed
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    rusqlite::Error::SqliteFailure(
                        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                        Some(format!("Failed to create directory: {}", e)),
                    )
                })?;
            }
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&config.path, flags)?;
        conn.busy_timeout(config.busy_timeout)?;

        if reader {
            conn.execute_batch("PRAGMA query_only = ON;")?;
            return Ok(conn);
        }

        if config.wal_mode {
            // journal_mode returns the resulting mode as a row
            let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        }

        init_schema(&conn)?;
        Ok(conn)
    }

    /// Get reference to connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Get database path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Write WAL contents back into the main database file.
    /// Returns false when readers kept the checkpoint from completing.
    pub fn checkpoint(&self) -> rusqlite::Result<bool> {
        if self.config.is_in_memory() {
            return Ok(true);
        }
        let busy: i64 = self
            .conn
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |row| row.get(0))?;
        Ok(busy == 0)
    }

    /// Execute a function within a transaction
    pub fn transaction<T, F>(&mut self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        let tx = self.conn.transaction().map_err(StoreError::write)?;
        let result = f(&tx)?;
        tx.commit().map_err(StoreError::write)?;
        Ok(result)
    }
}
