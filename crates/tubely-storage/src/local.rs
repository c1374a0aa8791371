use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::AsyncRead;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage (e.g., "/var/lib/tubely/videos")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys with traversal sequences that could escape the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(storage_key);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        } else if path.strip_prefix(&self.base_path).is_err() {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(path)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let written = match tokio::io::copy(&mut reader, &mut file).await {
            Ok(n) => file.sync_all().await.map(|_| n),
            Err(e) => Err(e),
        };

        let bytes_copied = match written {
            Ok(n) => n,
            Err(e) => {
                drop(file);
                if let Err(remove_err) = fs::remove_file(&path).await {
                    tracing::warn!(
                        error = %remove_err,
                        path = %path.display(),
                        "Failed to remove partial upload"
                    );
                }
                return Err(StorageError::UploadFailed(format!(
                    "Failed to write stream to file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            content_type = %content_type,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok(bytes_copied)
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_storage_stream_upload() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let data = b"stream test data".to_vec();
        let reader = Box::pin(std::io::Cursor::new(data.clone()));

        let size = storage
            .upload_stream("landscape/stream.mp4", "video/mp4", reader)
            .await
            .unwrap();
        assert_eq!(size, data.len() as u64);

        let downloaded = storage.download("landscape/stream.mp4").await.unwrap();
        assert_eq!(data, downloaded);
    }

    #[tokio::test]
    async fn test_upload_file() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("objects")).await.unwrap();

        let source = dir.path().join("source.mp4");
        std::fs::write(&source, b"video bytes").unwrap();

        storage
            .upload_file("portrait/file.mp4", &source, "video/mp4")
            .await
            .unwrap();
        assert!(storage.exists("portrait/file.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn test_upload_file_missing_source_fails() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage
            .upload_file("other/x.mp4", &dir.path().join("missing.mp4"), "video/mp4")
            .await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert!(!storage.exists("other/x.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.download("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_local_storage_delete_nonexistent() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.delete("nonexistent/file.mp4").await;
        assert!(result.is_ok());
    }
}
