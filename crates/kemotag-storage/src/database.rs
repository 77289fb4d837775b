//! Database connection and operations

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::error::StorageError;
use crate::migrations::run_migrations;
use crate::Result;

/// Where the offline store lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum StorageTarget {
    File(PathBuf),
    Memory,
    /// The environment has no storage engine; every operation fails.
    Unavailable,
}

type Handle = Arc<Mutex<Connection>>;

/// Lazily opened, process-wide connection to the offline store.
///
/// Construction never touches the engine. The first call to [`Database::handle`]
/// opens the connection, runs migrations and caches it; concurrent first
/// callers wait on the same open instead of racing. Clones share the cache.
pub struct Database {
    target: StorageTarget,
    max_page_count: Option<u32>,
    clock: Arc<dyn Clock>,
    handle: Arc<tokio::sync::Mutex<Option<Handle>>>,
    opens: Arc<AtomicUsize>,
}

impl Database {
    pub fn new(target: StorageTarget) -> Self {
        Self {
            target,
            max_page_count: None,
            clock: Arc::new(SystemClock),
            handle: Arc::new(tokio::sync::Mutex::new(None)),
            opens: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn open_in_memory() -> Self {
        Self::new(StorageTarget::Memory)
    }

    pub fn unavailable() -> Self {
        Self::new(StorageTarget::Unavailable)
    }

    /// Caps the database size in pages; writes past it fail with `SQLITE_FULL`.
    pub fn with_max_page_count(mut self, pages: u32) -> Self {
        self.max_page_count = Some(pages);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn target(&self) -> &StorageTarget {
        &self.target
    }

    pub fn is_available(&self) -> bool {
        self.target != StorageTarget::Unavailable
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Shared clock, for reading time inside a transaction closure.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// How many times the engine has actually been opened.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    async fn handle(&self) -> Result<Handle> {
        if !self.is_available() {
            return Err(StorageError::NotAvailable);
        }

        // Held across the open so a second caller reuses the first one's handle.
        let mut slot = self.handle.lock().await;
        if let Some(handle) = slot.as_ref() {
            return Ok(Arc::clone(handle));
        }

        let target = self.target.clone();
        let max_page_count = self.max_page_count;
        let conn =
            tokio::task::spawn_blocking(move || open_connection(&target, max_page_count)).await??;

        self.opens.fetch_add(1, Ordering::SeqCst);
        let handle = Arc::new(Mutex::new(conn));
        *slot = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// Opens the store if needed without running any operation.
    pub async fn connect(&self) -> Result<()> {
        self.handle().await.map(|_| ())
    }

    /// Drops the cached handle so the next operation reopens the store.
    pub async fn reset(&self) {
        if self.handle.lock().await.take().is_some() {
            tracing::debug!("Released cached offline store handle");
        }
    }

    /// Runs `f` in a deferred (read) transaction.
    pub async fn read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.transaction(TransactionBehavior::Deferred, f).await
    }

    /// Runs `f` in an immediate (write) transaction.
    ///
    /// Resolves only once the transaction has committed.
    pub async fn write<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.transaction(TransactionBehavior::Immediate, f).await
    }

    async fn transaction<F, T>(&self, behavior: TransactionBehavior, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = self.handle().await?;
        tokio::task::spawn_blocking(move || -> Result<T> {
            let mut conn = handle.lock();
            let tx = conn.transaction_with_behavior(behavior)?;
            let result = f(&tx)?;
            tx.commit()?;
            Ok(result)
        })
        .await?
    }
}

fn open_connection(target: &StorageTarget, max_page_count: Option<u32>) -> Result<Connection> {
    let conn = match target {
        StorageTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let conn = Connection::open(path).map_err(|source| StorageError::Open {
                path: path.clone(),
                source,
            })?;

            // WAL mode for better concurrent performance
            let _: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            conn
        }
        StorageTarget::Memory => Connection::open_in_memory()?,
        StorageTarget::Unavailable => return Err(StorageError::NotAvailable),
    };

    run_migrations(&conn)?;

    if let Some(pages) = max_page_count {
        // SQLite never lowers the limit below the current page count
        let _: i64 =
            conn.pragma_update_and_check(None, "max_page_count", pages, |row| row.get(0))?;
    }

    tracing::info!(storage = ?target, "Opened offline store");
    Ok(conn)
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            max_page_count: self.max_page_count,
            clock: Arc::clone(&self.clock),
            handle: Arc::clone(&self.handle),
            opens: Arc::clone(&self.opens),
        }
    }
}
