//! Application state shared by all handlers.

use tubely_core::Config;

use crate::services::ingest::{ThumbnailIngestor, VideoIngestor};

pub struct AppState {
    pub config: Config,
    pub video_ingestor: VideoIngestor,
    pub thumbnail_ingestor: ThumbnailIngestor,
}
