//! Service construction

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::{VideoRepository, VideoStore};
use tubely_processing::{CommandRunner, TokioCommandRunner};
use tubely_storage::Storage;

use crate::services::ingest::{ThumbnailIngestor, VideoIngestor, VideoIngestorConfig};
use crate::state::AppState;

/// Build the repositories and ingestion services and wrap them in [`AppState`].
pub async fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    tokio::fs::create_dir_all(&config.assets_root)
        .await
        .with_context(|| {
            format!(
                "Failed to create assets directory {}",
                config.assets_root.display()
            )
        })?;
    tokio::fs::create_dir_all(&config.staging_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create staging directory {}",
                config.staging_dir.display()
            )
        })?;

    let videos: Arc<dyn VideoStore> = Arc::new(VideoRepository::new(pool));
    let runner: Arc<dyn CommandRunner> =
        Arc::new(TokioCommandRunner::new(config.tool_timeout()));

    let video_ingestor = VideoIngestor::new(
        VideoIngestorConfig::from(config),
        videos.clone(),
        storage,
        runner,
    );
    let thumbnail_ingestor = ThumbnailIngestor::new(config, videos);

    tracing::info!(
        ffprobe_path = %config.ffprobe_path,
        ffmpeg_path = %config.ffmpeg_path,
        staging_dir = %config.staging_dir.display(),
        assets_root = %config.assets_root.display(),
        video_public_base = %config.video_public_base(),
        "Ingestion services initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        video_ingestor,
        thumbnail_ingestor,
    }))
}
