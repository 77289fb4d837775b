//! Uniform result envelope for storage operations

use std::future::Future;

use serde::Serialize;

use crate::error::StorageError;
use crate::mapping::{to_error, OfflineError};

pub type OfflineResult<T> = std::result::Result<T, OfflineError>;

/// Executes a storage operation and normalizes its outcome.
///
/// This is the only place raw [`StorageError`]s are converted; nothing
/// else in the workspace hands them to callers.
pub async fn run<T, F, Fut>(op: F) -> OfflineResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, StorageError>>,
{
    match op().await {
        Ok(data) => Ok(data),
        Err(raw) => {
            let error = to_error(raw);
            tracing::warn!(
                code = %error.code,
                reason = %error.message,
                "Offline store operation failed"
            );
            Err(error)
        }
    }
}

/// Serializable `{ success, data, error }` shape for IPC boundaries
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OfflineError>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: OfflineError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T> From<OfflineResult<T>> for Envelope<T> {
    fn from(result: OfflineResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => Self::err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::ErrorCode;

    #[tokio::test]
    async fn test_run_wraps_success() {
        let result = run(|| async { Ok::<_, StorageError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_run_maps_failure() {
        let result: OfflineResult<()> = run(|| async { Err(StorageError::NotAvailable) }).await;
        assert_eq!(result.unwrap_err().code, ErrorCode::DbNotAvailable);
    }

    #[tokio::test]
    async fn test_run_maps_panicked_task_to_generic_failure() {
        let result: OfflineResult<()> = run(|| async {
            tokio::task::spawn_blocking(|| -> u32 { panic!("boom") }).await?;
            Ok::<(), StorageError>(())
        })
        .await;

        let error = result.unwrap_err();
        assert_eq!(error.code, ErrorCode::OperationFailed);
        assert_eq!(error.message, "Unknown error");
        assert!(error.cause.is_none());
    }

    #[test]
    fn test_envelope_serialization() {
        let ok: Envelope<u32> = Ok(3).into();
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({ "success": true, "data": 3 })
        );

        let err: Envelope<u32> = Err(OfflineError::new(ErrorCode::NotFound, "missing")).into();
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({
                "success": false,
                "error": { "code": "NOT_FOUND", "message": "missing" }
            })
        );
    }
}
