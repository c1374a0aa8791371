//! Test helpers: build ingestion services, AppState and router without
//! external services.
//!
//! Run from workspace root: `cargo test -p tubely-api`. The metadata store is
//! in memory, ffprobe/ffmpeg are scripted and object storage is an in-memory
//! object store behind the S3 backend.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod runner;
pub mod storage;
pub mod store;

use axum_test::TestServer;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::setup::routes;
use tubely_api::{AppState, ThumbnailIngestor, VideoIngestor, VideoIngestorConfig};
use tubely_core::models::Video;
use tubely_core::Config;
use tubely_storage::Storage;
use uuid::Uuid;

use runner::FakeRunner;
use store::InMemoryVideoStore;

pub const VIDEO_PUBLIC_BASE: &str = "https://cdn.tubely.test";
pub const PLATFORM_URL: &str = "http://localhost:8091";

/// Everything one test needs, each piece individually inspectable.
pub struct TestEnv {
    pub config: Config,
    pub videos: Arc<InMemoryVideoStore>,
    pub runner: Arc<FakeRunner>,
    pub storage: Arc<dyn Storage>,
    pub staging: TempDir,
    pub assets: TempDir,
}

impl TestEnv {
    /// 16:9 geometry, in-memory S3.
    pub fn new() -> Self {
        Self::with(
            FakeRunner::with_geometry(1920, 1080),
            storage::in_memory_s3(),
        )
    }

    pub fn with(runner: FakeRunner, storage: Arc<dyn Storage>) -> Self {
        let staging = tempfile::tempdir().expect("Failed to create staging dir");
        let assets = tempfile::tempdir().expect("Failed to create assets dir");

        let vars: HashMap<&str, String> = HashMap::from([
            ("JWT_SECRET", auth::TEST_JWT_SECRET.to_string()),
            ("DATABASE_URL", "postgres://tubely@localhost/tubely".to_string()),
            ("S3_BUCKET", storage::TEST_BUCKET.to_string()),
            ("S3_REGION", "us-east-2".to_string()),
            ("S3_CF_DISTRIBUTION", VIDEO_PUBLIC_BASE.to_string()),
            ("PLATFORM_URL", PLATFORM_URL.to_string()),
            ("CORS_ORIGINS", "http://localhost:8091".to_string()),
            ("STAGING_DIR", staging.path().to_string_lossy().to_string()),
            ("ASSETS_ROOT", assets.path().to_string_lossy().to_string()),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).cloned())
            .expect("Failed to build test config");
        config.validate().expect("Test config must be valid");

        Self {
            config,
            videos: Arc::new(InMemoryVideoStore::default()),
            runner: Arc::new(runner),
            storage,
            staging,
            assets,
        }
    }

    pub fn video_ingestor(&self) -> VideoIngestor {
        VideoIngestor::new(
            VideoIngestorConfig::from(&self.config),
            self.videos.clone(),
            self.storage.clone(),
            self.runner.clone(),
        )
    }

    pub fn thumbnail_ingestor(&self) -> ThumbnailIngestor {
        ThumbnailIngestor::new(&self.config, self.videos.clone())
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::new(AppState {
            config: self.config.clone(),
            video_ingestor: self.video_ingestor(),
            thumbnail_ingestor: self.thumbnail_ingestor(),
        })
    }

    pub fn server(&self) -> TestServer {
        let app = routes::setup_routes(&self.config, self.state()).expect("Failed to build router");
        TestServer::new(app.into_make_service()).expect("Failed to create test server")
    }

    /// Insert a video owned by a fresh user; returns `(user_id, video)`.
    pub fn owned_video(&self) -> (Uuid, Video) {
        let user_id = Uuid::new_v4();
        let video = Video::new(user_id, "Boots on the ground", "A walk through the city");
        self.videos.insert(video.clone());
        (user_id, video)
    }

    /// Files currently in the staging directory.
    pub fn staged_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.staging.path())
            .expect("Failed to read staging dir")
            .map(|entry| entry.expect("Failed to read dir entry").path())
            .collect()
    }

    /// Storage key of a published video URL.
    pub fn storage_key_of(video_url: &str) -> &str {
        video_url
            .strip_prefix(VIDEO_PUBLIC_BASE)
            .and_then(|rest| rest.strip_prefix('/'))
            .expect("video_url must start with the public base")
    }
}
