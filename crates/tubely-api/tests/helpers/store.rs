use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_db::VideoStore;
use uuid::Uuid;

/// `VideoStore` backed by a map, with switchable update failures.
#[derive(Default)]
pub struct InMemoryVideoStore {
    videos: Mutex<HashMap<Uuid, Video>>,
    fail_updates: AtomicBool,
    updates: AtomicUsize,
}

impl InMemoryVideoStore {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    fn update(&self, id: Uuid, apply: impl FnOnce(&mut Video)) -> Result<Video, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection reset by peer".to_string()));
        }

        let mut videos = self.videos.lock().unwrap();
        let video = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;
        apply(video);
        video.updated_at = Utc::now();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(video.clone())
    }

    /// Number of successful updates.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoStore for InMemoryVideoStore {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.get(id))
    }

    async fn set_video_url(&self, id: Uuid, video_url: &str) -> Result<Video, AppError> {
        self.update(id, |video| video.video_url = Some(video_url.to_string()))
    }

    async fn set_thumbnail_url(&self, id: Uuid, thumbnail_url: &str) -> Result<Video, AppError> {
        self.update(id, |video| {
            video.thumbnail_url = Some(thumbnail_url.to_string())
        })
    }
}
