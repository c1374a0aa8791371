use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use tubely_core::models::Video;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::parse_video_id;
use crate::state::AppState;
use crate::utils::upload::read_file_field;

/// Multipart field carrying the video file.
pub const VIDEO_FIELD: &str = "video";

#[utoipa::path(
    post,
    path = "/api/video_upload/{video_id}",
    tag = "videos",
    params(
        ("video_id" = String, Path, description = "ID of the video record to attach the upload to")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded and published", body = Video),
        (status = 400, description = "Invalid ID or malformed form", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Content type not allowed", body = ErrorResponse),
        (status = 422, description = "File could not be probed or remuxed", body = ErrorResponse),
        (status = 502, description = "Object storage upload failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %user.user_id))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let ingestor = &state.video_ingestor;

    let video = ingestor.authorize(video_id, user.user_id).await?;

    let mut multipart = multipart?;
    let file = read_file_field(&mut multipart, VIDEO_FIELD, ingestor.max_file_size()).await?;

    tracing::info!(
        video_id = %video_id,
        size_bytes = file.len(),
        content_type = %file.content_type,
        "Uploading video"
    );

    let video = ingestor.ingest_authorized(video, file).await?;
    Ok(Json(video))
}
