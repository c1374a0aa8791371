use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, ObjectStoreExt, Result as ObjectResult,
};
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// S3 storage implementation
///
/// Uploads go through a multipart `BufWriter`, so objects of any size are
/// streamed from the reader in bounded chunks.
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        // Credentials come from the standard AWS_* environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store: Arc::new(store),
            bucket,
        })
    }

    /// Wrap an existing object store, e.g. `object_store::memory::InMemory`.
    pub fn with_store(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        S3Storage {
            store,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl Storage for S3Storage {
    #[tracing::instrument(skip(self, reader), fields(bucket = %self.bucket))]
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );

        let mut writer =
            BufWriter::new(Arc::clone(&self.store), location).with_attributes(attributes);

        let copied = tokio::io::copy(&mut reader, &mut writer).await;
        let result = match copied {
            Ok(size) => writer.shutdown().await.map(|_| size),
            Err(e) => Err(e),
        };

        let size = match result {
            Ok(size) => size,
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        error = %abort_err,
                        key = %storage_key,
                        "Failed to abort S3 multipart upload"
                    );
                }
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream upload failed"
                );
                return Err(StorageError::UploadFailed(e.to_string()));
            }
        };

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 stream upload successful"
        );

        Ok(size)
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => StorageError::DownloadFailed(other.to_string()),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let location = Path::from(storage_key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    fn memory_storage() -> (Arc<InMemory>, S3Storage) {
        let store = Arc::new(InMemory::new());
        let storage = S3Storage::with_store(store.clone(), "tubely-test");
        (store, storage)
    }

    #[tokio::test]
    async fn test_upload_stream_stores_bytes_and_content_type() {
        let (store, storage) = memory_storage();
        let data = b"\x00\x00\x00\x18ftypmp42".to_vec();
        let reader = Box::pin(std::io::Cursor::new(data.clone()));

        let size = storage
            .upload_stream("landscape/abc.mp4", "video/mp4", reader)
            .await
            .unwrap();
        assert_eq!(size, data.len() as u64);

        let result = store.get(&Path::from("landscape/abc.mp4")).await.unwrap();
        let content_type: Option<&str> = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.as_ref());
        assert_eq!(content_type, Some("video/mp4"));
        assert_eq!(result.bytes().await.unwrap().to_vec(), data);
    }

    #[tokio::test]
    async fn test_exists_and_delete() {
        let (_store, storage) = memory_storage();
        let reader = Box::pin(std::io::Cursor::new(b"x".to_vec()));
        storage
            .upload_stream("other/key.mp4", "video/mp4", reader)
            .await
            .unwrap();

        assert!(storage.exists("other/key.mp4").await.unwrap());
        storage.delete("other/key.mp4").await.unwrap();
        assert!(!storage.exists("other/key.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn test_download_missing_is_not_found() {
        let (_store, storage) = memory_storage();
        let result = storage.download("portrait/missing.mp4").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
