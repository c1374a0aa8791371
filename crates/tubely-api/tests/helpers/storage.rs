use async_trait::async_trait;
use object_store::memory::InMemory;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncRead;
use tubely_storage::{S3Storage, Storage, StorageBackend, StorageError, StorageResult};

pub const TEST_BUCKET: &str = "tubely-test";

/// S3 backend over an in-memory object store.
pub fn in_memory_s3() -> Arc<S3Storage> {
    Arc::new(S3Storage::with_store(Arc::new(InMemory::new()), TEST_BUCKET))
}

/// Storage whose uploads always fail; counts upload attempts.
#[derive(Default)]
pub struct FailingStorage {
    pub uploads: AtomicUsize,
}

#[async_trait]
impl Storage for FailingStorage {
    async fn upload_stream(
        &self,
        _storage_key: &str,
        _content_type: &str,
        _reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::UploadFailed("connection refused".to_string()))
    }

    async fn upload_file(
        &self,
        storage_key: &str,
        _path: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        self.upload_stream(storage_key, content_type, Box::pin(tokio::io::empty()))
            .await
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, _storage_key: &str) -> StorageResult<()> {
        Ok(())
    }

    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        Ok(false)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Wraps another backend and records the keys written and deleted.
pub struct RecordingStorage {
    inner: Arc<dyn Storage>,
    pub uploaded: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

impl RecordingStorage {
    pub fn new(inner: Arc<dyn Storage>) -> Self {
        Self {
            inner,
            uploaded: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let written = self
            .inner
            .upload_stream(storage_key, content_type, reader)
            .await?;
        self.uploaded.lock().unwrap().push(storage_key.to_string());
        Ok(written)
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.inner.download(storage_key).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.inner.delete(storage_key).await?;
        self.deleted.lock().unwrap().push(storage_key.to_string());
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        self.inner.exists(storage_key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
