//! Translation of raw engine failures into the offline error taxonomy

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StorageError;

const QUOTA_EXCEEDED_MESSAGE: &str = "Storage quota exceeded";
const NOT_FOUND_MESSAGE: &str = "Record not found";
const UNKNOWN_MESSAGE: &str = "Unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The environment has no usable storage engine.
    DbNotAvailable,
    /// A write was rejected by storage limits.
    QuotaExceeded,
    /// Catch-all for any other engine or logic failure.
    OperationFailed,
    /// The engine itself reported a missing entity.
    NotFound,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DbNotAvailable => "DB_NOT_AVAILABLE",
            ErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorCode::OperationFailed => "OPERATION_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, Serialize)]
#[error("{code}: {message}")]
pub struct OfflineError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip)]
    #[source]
    pub cause: Option<Arc<StorageError>>,
}

impl OfflineError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    fn caused_by(code: ErrorCode, message: impl Into<String>, cause: StorageError) -> Self {
        Self {
            code,
            message: message.into(),
            cause: Some(Arc::new(cause)),
        }
    }
}

/// Maps a raw storage failure onto its [`ErrorCode`].
pub fn to_error(raw: StorageError) -> OfflineError {
    if matches!(raw, StorageError::NotAvailable) {
        let message = raw.to_string();
        return OfflineError::caused_by(ErrorCode::DbNotAvailable, message, raw);
    }

    // A panicked or cancelled blocking task carries no usable error value.
    if matches!(raw, StorageError::Task(_)) {
        return OfflineError::new(ErrorCode::OperationFailed, UNKNOWN_MESSAGE);
    }

    match raw.sqlite_code() {
        Some(rusqlite::ErrorCode::DiskFull) => {
            return OfflineError::caused_by(
                ErrorCode::QuotaExceeded,
                QUOTA_EXCEEDED_MESSAGE,
                raw,
            );
        }
        Some(rusqlite::ErrorCode::NotFound) => {
            return OfflineError::caused_by(ErrorCode::NotFound, NOT_FOUND_MESSAGE, raw);
        }
        _ => {}
    }

    if matches!(raw, StorageError::Sqlite(rusqlite::Error::QueryReturnedNoRows)) {
        return OfflineError::caused_by(ErrorCode::NotFound, NOT_FOUND_MESSAGE, raw);
    }

    let message = raw.to_string();
    OfflineError::caused_by(ErrorCode::OperationFailed, message, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_failure(code: std::os::raw::c_int) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
    }

    #[test]
    fn test_not_available_maps_to_db_not_available() {
        let error = to_error(StorageError::NotAvailable);
        assert_eq!(error.code, ErrorCode::DbNotAvailable);
        assert!(error.cause.is_some());
    }

    #[test]
    fn test_disk_full_maps_to_quota_exceeded() {
        let error = to_error(StorageError::Sqlite(sqlite_failure(rusqlite::ffi::SQLITE_FULL)));
        assert_eq!(error.code, ErrorCode::QuotaExceeded);
        assert_eq!(error.message, QUOTA_EXCEEDED_MESSAGE);
    }

    #[test]
    fn test_engine_not_found_maps_to_not_found() {
        let error = to_error(StorageError::Sqlite(sqlite_failure(
            rusqlite::ffi::SQLITE_NOTFOUND,
        )));
        assert_eq!(error.code, ErrorCode::NotFound);

        let error = to_error(StorageError::Sqlite(rusqlite::Error::QueryReturnedNoRows));
        assert_eq!(error.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_other_failures_keep_their_message() {
        let raw = StorageError::SchemaTooNew {
            found: 2,
            supported: 1,
        };
        let expected = raw.to_string();
        let error = to_error(raw);
        assert_eq!(error.code, ErrorCode::OperationFailed);
        assert_eq!(error.message, expected);
        assert!(error.cause.is_some());
    }

    #[test]
    fn test_error_code_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::DbNotAvailable).unwrap();
        assert_eq!(json, "\"DB_NOT_AVAILABLE\"");
        assert_eq!(ErrorCode::QuotaExceeded.to_string(), "QUOTA_EXCEEDED");
    }
}
