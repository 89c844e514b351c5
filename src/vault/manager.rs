//! Record Manager
//!
//! Owns the store connections and exposes record CRUD. All writes go
//! through a single writer connection behind a mutex; file stores also keep
//! a pool of query-only readers so fetches never wait on a writer.
//! Listeners hear about a change only after it has committed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, TryLockError};

use rusqlite::Connection;

use crate::db::{self, Database, DatabaseConfig, Record, RecordId, StoreError, StoreResult};

use super::events::{ChangeEvent, ChangeListener};
use super::search;

/// Record manager
pub struct RecordManager {
    /// Serializes every mutating operation
    writer: Mutex<Database>,
    /// Query-only connections (empty for in-memory stores)
    readers: Vec<Mutex<Database>>,
    next_reader: AtomicUsize,
    /// Single listener slot
    listener: RwLock<Option<Arc<dyn ChangeListener>>>,
    path: PathBuf,
}

impl RecordManager {
    /// Open (or create) the store described by `config`
    pub fn open(config: DatabaseConfig) -> StoreResult<Self> {
        let writer = Database::open(config.clone())?;

        let readers = if config.is_in_memory() {
            Vec::new()
        } else {
            (0..config.readers)
                .map(|_| Database::open_reader(config.clone()).map(Mutex::new))
                .collect::<StoreResult<Vec<_>>>()?
        };

        log::info!(
            "Opened record store at {} ({} reader connections)",
            config.path.display(),
            readers.len()
        );

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            next_reader: AtomicUsize::new(0),
            listener: RwLock::new(None),
            path: config.path,
        })
    }

    /// Open a throwaway in-memory store
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(DatabaseConfig::in_memory())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register the listener, replacing any previous one. `None` clears it.
    pub fn set_listener(&self, listener: Option<Arc<dyn ChangeListener>>) {
        *self.listener.write().unwrap_or_else(PoisonError::into_inner) = listener;
    }

    /// All records, or those whose app name or user name contains `filter`
    /// (case-insensitive)
    pub fn fetch(&self, filter: Option<&str>) -> StoreResult<Vec<Record>> {
        let mut records = self
            .with_reader(db::get_all_records)
            .inspect_err(|e| log::error!("Fetch failed: {}", e))?;

        if let Some(filter) = filter {
            search::filter_records(&mut records, filter);
        }

        log::debug!("Fetched {} records (filter: {:?})", records.len(), filter);
        Ok(records)
    }

    /// Read a single record by ID
    pub fn get(&self, id: &RecordId) -> StoreResult<Record> {
        self.with_reader(|conn| db::get_record(conn, id))
    }

    /// Resolve a unique ID prefix to its record
    pub fn find_by_prefix(&self, prefix: &str) -> StoreResult<Record> {
        // An empty prefix would match every record
        if prefix.is_empty() {
            return Err(StoreError::NotFound(prefix.to_string()));
        }
        let mut matches = self.with_reader(|conn| db::get_records_by_id_prefix(conn, prefix))?;

        match matches.len() {
            0 => Err(StoreError::NotFound(prefix.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(StoreError::AmbiguousId(prefix.to_string())),
        }
    }

    /// Create and persist a new record, then announce it
    pub fn add(&self, app_name: &str, user_name: &str, password: &str) -> StoreResult<Record> {
        let record = Record::new(app_name.to_string(), user_name.to_string(), password.to_string());

        let stored = self
            .writer()
            .transaction(|conn| {
                db::insert_record(conn, &record)?;
                db::get_record(conn, &record.id).map_err(StoreError::into_write)
            })
            .inspect_err(|e| log::warn!("Failed to add record for '{}': {}", app_name, e))?;

        log::info!("Added record {} ({})", stored.id.short(), stored.app_name);
        self.notify(&ChangeEvent::Created { record: stored.clone() });
        Ok(stored)
    }

    /// Overwrite the app name, user name and password of `record`.
    ///
    /// The change is staged in a transaction; `record` itself is never
    /// touched, so on failure the caller still holds the last durable state.
    pub fn update(
        &self,
        record: &Record,
        app_name: &str,
        user_name: &str,
        password: &str,
    ) -> StoreResult<Record> {
        let (old, new) = self
            .writer()
            .transaction(|conn| {
                let old = db::get_record(conn, &record.id).map_err(StoreError::into_write)?;
                db::update_record_fields(conn, &record.id, app_name, user_name, password)?;
                let new = db::get_record(conn, &record.id).map_err(StoreError::into_write)?;
                Ok((old, new))
            })
            .inspect_err(|e| log::warn!("Failed to update record {}: {}", record.id.short(), e))?;

        log::info!("Updated record {} ({})", new.id.short(), new.app_name);
        self.notify(&ChangeEvent::Updated { old, new: new.clone() });
        Ok(new)
    }

    /// Persist the visibility preference. Failures are logged, not returned.
    pub fn set_visibility(&self, record: &Record, visible: bool) {
        let result = {
            let db = self.writer();
            db::set_record_visibility(db.conn(), &record.id, visible)
        };

        match result {
            Ok(()) => log::debug!("Record {} visibility set to {}", record.id.short(), visible),
            Err(e) => log::warn!(
                "Could not save visibility for record {}: {}",
                record.id.short(),
                e
            ),
        }
    }

    /// Remove a record and flush. Failures are logged, not returned.
    pub fn delete(&self, record: &Record) {
        let result = self.writer().transaction(|conn| {
            let old = db::get_record(conn, &record.id).map_err(StoreError::into_write)?;
            db::delete_record(conn, &record.id)?;
            Ok(old)
        });

        match result {
            Ok(old) => {
                log::info!("Deleted record {} ({})", old.id.short(), old.app_name);
                self.flush();
                self.notify(&ChangeEvent::Deleted { record: old });
            }
            Err(e) => log::warn!("Could not delete record {}: {}", record.id.short(), e),
        }
    }

    /// Push buffered writes into the main database file.
    /// Failures are logged, not returned.
    pub fn flush(&self) {
        match self.writer().checkpoint() {
            Ok(true) => log::debug!("Flushed record store"),
            Ok(false) => log::debug!("Flush incomplete, readers still active"),
            Err(e) => log::warn!("Could not flush record store: {}", e),
        }
    }

    /// Final flush before the connections are dropped
    pub fn close(self) {
        self.flush();
        log::info!("Closed record store at {}", self.path.display());
    }

    fn writer(&self) -> MutexGuard<'_, Database> {
        // SQLite rolls back any transaction a panicking holder left open
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_reader<T>(&self, f: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        if self.readers.is_empty() {
            return f(self.writer().conn());
        }

        for reader in &self.readers {
            match reader.try_lock() {
                Ok(guard) => return f(guard.conn()),
                Err(TryLockError::Poisoned(p)) => return f(p.into_inner().conn()),
                Err(TryLockError::WouldBlock) => continue,
            }
        }

        let idx = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let guard = self.readers[idx].lock().unwrap_or_else(PoisonError::into_inner);
        f(guard.conn())
    }

    fn notify(&self, event: &ChangeEvent) {
        let listener = self
            .listener
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(listener) = listener {
            event.dispatch(listener.as_ref());
        }
    }
}
