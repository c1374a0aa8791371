use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres};
use tubely_core::{models::Video, AppError};
use uuid::Uuid;

/// Metadata record access needed by ingestion.
///
/// Each orchestrator writes only the URL column it owns, so a video ingest and
/// a thumbnail ingest on the same record never overwrite each other.
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Set `video_url` and return the stored record. Fails with `NotFound`
    /// when the record no longer exists.
    async fn set_video_url(&self, id: Uuid, video_url: &str) -> Result<Video, AppError>;

    /// Set `thumbnail_url` and return the stored record. Fails with
    /// `NotFound` when the record no longer exists.
    async fn set_thumbnail_url(&self, id: Uuid, thumbnail_url: &str) -> Result<Video, AppError>;
}

/// Repository for managing video records
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for VideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            "SELECT id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at FROM videos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self, video_url), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn set_video_url(&self, id: Uuid, video_url: &str) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            UPDATE videos
            SET video_url = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(video_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        video.ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }

    #[tracing::instrument(skip(self, thumbnail_url), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn set_thumbnail_url(&self, id: Uuid, thumbnail_url: &str) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            UPDATE videos
            SET thumbnail_url = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(thumbnail_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        video.ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }
}
