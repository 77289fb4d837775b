//! Raw storage engine failures

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage engine is not available in this environment")]
    NotAvailable,

    #[error("Failed to open database at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: i32, supported: i32 },

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// The SQLite primary result code behind this failure, if any.
    pub fn sqlite_code(&self) -> Option<rusqlite::ErrorCode> {
        match self {
            StorageError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
            | StorageError::Open {
                source: rusqlite::Error::SqliteFailure(err, _),
                ..
            } => Some(err.code),
            _ => None,
        }
    }
}
