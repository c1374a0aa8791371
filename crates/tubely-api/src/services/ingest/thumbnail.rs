//! Thumbnail ingestion and retrieval
//!
//! Thumbnails live on local disk as `{assets_root}/{video_id}.{ext}`; the
//! file is the only copy, and the read path serves it from there.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tubely_core::models::Video;
use tubely_core::{AppError, Config};
use tubely_db::VideoStore;
use tubely_processing::{extension_for_content_type, MediaValidator};
use uuid::Uuid;

use super::types::UploadedFile;

/// Extensions a stored thumbnail may have, with the content type served for each.
const THUMBNAIL_FORMATS: [(&str, &str); 2] = [("png", "image/png"), ("jpg", "image/jpeg")];

/// A thumbnail read back from the assets directory.
#[derive(Debug, Clone)]
pub struct StoredThumbnail {
    pub bytes: Bytes,
    pub content_type: &'static str,
}

pub struct ThumbnailIngestor {
    videos: Arc<dyn VideoStore>,
    validator: MediaValidator,
    assets_root: PathBuf,
    platform_url: String,
}

impl ThumbnailIngestor {
    pub fn new(config: &Config, videos: Arc<dyn VideoStore>) -> Self {
        Self::with_settings(
            videos,
            MediaValidator::new(
                config.max_thumbnail_size_bytes,
                config.thumbnail_allowed_content_types.clone(),
            ),
            config.assets_root.clone(),
            config.platform_url.clone(),
        )
    }

    pub fn with_settings(
        videos: Arc<dyn VideoStore>,
        validator: MediaValidator,
        assets_root: impl Into<PathBuf>,
        platform_url: impl Into<String>,
    ) -> Self {
        Self {
            videos,
            validator,
            assets_root: assets_root.into(),
            platform_url: platform_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.validator.max_file_size()
    }

    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }

    async fn find_video(&self, video_id: Uuid) -> Result<Video, AppError> {
        self.videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))
    }

    /// Store `file` as the thumbnail of `video_id` and point the record at it.
    ///
    /// A thumbnail in the other format is removed only once the record points
    /// at the new file, so the stored URL always resolves.
    #[tracing::instrument(skip(self, file), fields(size_bytes = file.len()))]
    pub async fn ingest(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        file: UploadedFile,
    ) -> Result<Video, AppError> {
        let video = self.find_video(video_id).await?;
        if !video.is_owned_by(user_id) {
            return Err(AppError::Forbidden(
                "You are not the owner of this video".to_string(),
            ));
        }

        let content_type = self.validator.validate_all(&file.content_type, file.len())?;
        let extension = extension_for_content_type(&content_type).ok_or_else(|| {
            AppError::UnsupportedMediaType(format!("No file extension for {}", content_type))
        })?;

        tokio::fs::create_dir_all(&self.assets_root).await?;
        let path = self.assets_root.join(format!("{}.{}", video_id, extension));
        tokio::fs::write(&path, &file.bytes).await?;

        let thumbnail_url = format!("{}/assets/{}.{}", self.platform_url, video_id, extension);
        let updated = match self.videos.set_thumbnail_url(video_id, &thumbnail_url).await {
            Ok(updated) => updated,
            Err(e) => {
                if video.thumbnail_url.as_deref() != Some(thumbnail_url.as_str()) {
                    remove_if_present(&path).await;
                }
                return Err(AppError::RecordPersist(e.to_string()));
            }
        };

        self.remove_stale(video_id, extension).await;

        tracing::info!(
            path = %path.display(),
            thumbnail_url = %thumbnail_url,
            "Thumbnail stored"
        );

        Ok(updated)
    }

    /// Remove a thumbnail left over from an upload in another format.
    async fn remove_stale(&self, video_id: Uuid, keep_extension: &str) {
        for (extension, _) in THUMBNAIL_FORMATS {
            if extension != keep_extension {
                let stale = self.assets_root.join(format!("{}.{}", video_id, extension));
                remove_if_present(&stale).await;
            }
        }
    }

    /// Load the stored thumbnail of `video_id`.
    pub async fn load(&self, video_id: Uuid) -> Result<StoredThumbnail, AppError> {
        self.find_video(video_id).await?;

        for (extension, content_type) in THUMBNAIL_FORMATS {
            let path = self.assets_root.join(format!("{}.{}", video_id, extension));
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    return Ok(StoredThumbnail {
                        bytes: Bytes::from(bytes),
                        content_type,
                    })
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::NotFound("Thumbnail not found".to_string()))
    }
}

async fn remove_if_present(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed thumbnail file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            error = %e,
            path = %path.display(),
            "Failed to remove thumbnail file"
        ),
    }
}
