use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// A single logical video owned by one user.
///
/// `video_url` and `thumbnail_url` stay `None` until the matching ingestion
/// completes; once set they point at an object that existed when the record
/// was last written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "videoURL")]
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new(user_id: Uuid, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: description.into(),
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Coarse categorization of a video's width-to-height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AspectClass {
    Landscape,
    Portrait,
    Other,
}

impl AspectClass {
    /// Path segment used when this class prefixes a storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectClass::Landscape => "landscape",
            AspectClass::Portrait => "portrait",
            AspectClass::Other => "other",
        }
    }
}

impl Display for AspectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_video_has_no_urls() {
        let owner = Uuid::new_v4();
        let video = Video::new(owner, "Boots", "a video about boots");
        assert!(video.video_url.is_none());
        assert!(video.thumbnail_url.is_none());
        assert!(video.is_owned_by(owner));
        assert!(!video.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn video_serializes_with_client_field_names() {
        let mut video = Video::new(Uuid::new_v4(), "Boots", "a video about boots");
        video.video_url = Some("https://cdn.example/landscape/abc.mp4".to_string());

        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["userID"], video.user_id.to_string());
        assert_eq!(json["videoURL"], "https://cdn.example/landscape/abc.mp4");
        assert!(json["thumbnailURL"].is_null());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("video_url").is_none());

        let back: Video = serde_json::from_value(json).unwrap();
        assert_eq!(back, video);
    }

    #[test]
    fn aspect_class_serializes_lowercase() {
        let json = serde_json::to_string(&AspectClass::Landscape).unwrap();
        assert_eq!(json, "\"landscape\"");
        assert_eq!(AspectClass::Portrait.to_string(), "portrait");
    }
}
