//! Video ingestion
//!
//! Stages, strictly in order: authorize -> validate -> stage -> probe ->
//! classify -> remux -> derive key -> upload -> update record -> cleanup.
//! Nothing is written to disk before the caller is authorized and the upload
//! validated. Temporary files are owned by a [`TempArtifacts`] guard and are
//! removed on every exit path.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tubely_core::models::Video;
use tubely_core::{AppError, Config};
use tubely_db::VideoStore;
use tubely_processing::{
    classify, extension_for_content_type, CommandRunner, FaststartRemuxer, GeometryProber,
    MediaValidator, TempArtifacts,
};
use tubely_storage::{Storage, StorageKey};
use uuid::Uuid;

use super::types::UploadedFile;

/// Settings for [`VideoIngestor`], usually derived from [`Config`].
#[derive(Debug, Clone)]
pub struct VideoIngestorConfig {
    pub max_file_size: usize,
    pub allowed_content_types: Vec<String>,
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    /// Directory for staged uploads and remux output.
    pub staging_dir: PathBuf,
    /// Prefix of every published video URL; the storage key is appended.
    pub public_base: String,
    pub upload_timeout: Duration,
}

impl From<&Config> for VideoIngestorConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_file_size: config.max_video_size_bytes,
            allowed_content_types: config.video_allowed_content_types.clone(),
            ffprobe_path: config.ffprobe_path.clone(),
            ffmpeg_path: config.ffmpeg_path.clone(),
            staging_dir: config.staging_dir.clone(),
            public_base: config.video_public_base(),
            upload_timeout: config.upload_timeout(),
        }
    }
}

pub struct VideoIngestor {
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
    validator: MediaValidator,
    prober: GeometryProber,
    remuxer: FaststartRemuxer,
    staging_dir: PathBuf,
    public_base: String,
    upload_timeout: Duration,
}

impl VideoIngestor {
    pub fn new(
        config: VideoIngestorConfig,
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            videos,
            storage,
            validator: MediaValidator::new(config.max_file_size, config.allowed_content_types),
            prober: GeometryProber::new(runner.clone(), config.ffprobe_path),
            remuxer: FaststartRemuxer::new(runner, config.ffmpeg_path),
            staging_dir: config.staging_dir,
            public_base: config.public_base.trim_end_matches('/').to_string(),
            upload_timeout: config.upload_timeout,
        }
    }

    /// Largest accepted upload, in bytes.
    pub fn max_file_size(&self) -> usize {
        self.validator.max_file_size()
    }

    /// Fetch the record and check that `user_id` owns it.
    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        let video = self
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        if !video.is_owned_by(user_id) {
            tracing::debug!(video_id = %video_id, user_id = %user_id, "Upload by non-owner rejected");
            return Err(AppError::Forbidden(
                "You are not the owner of this video".to_string(),
            ));
        }

        Ok(video)
    }

    /// Run the whole pipeline for `user_id` uploading `file` to `video_id`.
    pub async fn ingest(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        file: UploadedFile,
    ) -> Result<Video, AppError> {
        let video = self.authorize(video_id, user_id).await?;
        self.ingest_authorized(video, file).await
    }

    /// Pipeline from validation onwards, for a record already returned by
    /// [`VideoIngestor::authorize`].
    #[tracing::instrument(skip(self, video, file), fields(video_id = %video.id, size_bytes = file.len()))]
    pub async fn ingest_authorized(
        &self,
        video: Video,
        file: UploadedFile,
    ) -> Result<Video, AppError> {
        let start = Instant::now();
        let content_type = self.validator.validate_all(&file.content_type, file.len())?;

        let mut artifacts = TempArtifacts::new();
        let result = self
            .process(video.id, &content_type, &file, &mut artifacts)
            .await;
        artifacts.cleanup().await;

        if let Ok(updated) = &result {
            tracing::info!(
                duration_ms = start.elapsed().as_millis(),
                video_url = updated.video_url.as_deref().unwrap_or_default(),
                "Video ingested"
            );
        }

        result
    }

    async fn process(
        &self,
        video_id: Uuid,
        content_type: &str,
        file: &UploadedFile,
        artifacts: &mut TempArtifacts,
    ) -> Result<Video, AppError> {
        let extension = extension_for_content_type(content_type).unwrap_or("mp4");

        let staged = self
            .staging_dir
            .join(format!("tubely-upload-{}.{}", Uuid::new_v4(), extension));
        artifacts.register(&staged);
        tokio::fs::write(&staged, &file.bytes).await?;
        tracing::debug!(path = %staged.display(), size_bytes = file.len(), "Upload staged");

        let geometry = self.prober.probe(&staged).await?;
        let aspect = classify(geometry.width, geometry.height);
        tracing::debug!(
            width = geometry.width,
            height = geometry.height,
            aspect = %aspect,
            "Video classified"
        );

        artifacts.register(FaststartRemuxer::output_path_for(&staged));
        let processed = self.remuxer.remux(&staged).await?;

        let storage_key = StorageKey::generate(Some(aspect), extension);
        self.upload(&storage_key, &processed, content_type).await?;

        let video_url = format!("{}/{}", self.public_base, storage_key);
        match self.videos.set_video_url(video_id, &video_url).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    video_id = %video_id,
                    storage_key = %storage_key,
                    "Failed to persist video URL; uploaded object is orphaned"
                );
                self.discard_orphan(&storage_key).await;
                Err(AppError::RecordPersist(e.to_string()))
            }
        }
    }

    async fn upload(
        &self,
        storage_key: &StorageKey,
        path: &Path,
        content_type: &str,
    ) -> Result<(), AppError> {
        let start = Instant::now();
        let upload = self
            .storage
            .upload_file(storage_key.as_str(), path, content_type);

        match tokio::time::timeout(self.upload_timeout, upload).await {
            Ok(Ok(size_bytes)) => {
                tracing::info!(
                    storage_key = %storage_key,
                    size_bytes = size_bytes,
                    duration_ms = start.elapsed().as_millis(),
                    "Video uploaded to storage"
                );
                Ok(())
            }
            Ok(Err(e)) => Err(AppError::Upload(e.to_string())),
            Err(_) => Err(AppError::Upload(format!(
                "Upload timed out after {}s",
                self.upload_timeout.as_secs()
            ))),
        }
    }

    async fn discard_orphan(&self, storage_key: &StorageKey) {
        match self.storage.delete(storage_key.as_str()).await {
            Ok(()) => tracing::info!(storage_key = %storage_key, "Deleted orphaned object"),
            Err(e) => tracing::error!(
                error = %e,
                storage_key = %storage_key,
                "Failed to delete orphaned object"
            ),
        }
    }
}
