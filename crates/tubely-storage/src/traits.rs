//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::path::Path;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            StorageError::InvalidKey(msg) => AppError::BadRequest(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::Upload(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait so
/// the ingestion pipeline can publish objects without knowing where they land.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload an object from a reader, consumed until EOF.
    ///
    /// The content is streamed; it is never buffered whole in memory. The
    /// content type is stored as object metadata where the backend supports it.
    /// Returns the number of bytes written.
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64>;

    /// Upload a local file under the given key.
    async fn upload_file(
        &self,
        storage_key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        let file = tokio::fs::File::open(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.upload_stream(storage_key, content_type, Box::pin(file))
            .await
    }

    /// Download an object fully into memory
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object by its storage key
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::ErrorMetadata;

    #[test]
    fn test_upload_failures_map_to_upload_error() {
        let err: AppError = StorageError::UploadFailed("connection reset".to_string()).into();
        assert_eq!(err.http_status_code(), 502);

        let err: AppError =
            StorageError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "eof")).into();
        assert_eq!(err.error_code(), "UPLOAD_ERROR");
    }

    #[test]
    fn test_invalid_key_maps_to_bad_request() {
        let err: AppError = StorageError::InvalidKey("..".to_string()).into();
        assert_eq!(err.http_status_code(), 400);
    }
}
