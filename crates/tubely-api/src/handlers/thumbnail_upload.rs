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

/// Multipart field carrying the thumbnail image.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{video_id}",
    tag = "thumbnails",
    params(
        ("video_id" = String, Path, description = "ID of the video the thumbnail belongs to")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail stored", body = Video),
        (status = 400, description = "Invalid ID or malformed form", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Content type not allowed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %user.user_id))]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let ingestor = &state.thumbnail_ingestor;

    let mut multipart = multipart?;
    let file = read_file_field(&mut multipart, THUMBNAIL_FIELD, ingestor.max_file_size()).await?;

    tracing::info!(
        video_id = %video_id,
        size_bytes = file.len(),
        content_type = %file.content_type,
        "Uploading thumbnail"
    );

    let video = ingestor.ingest(video_id, user.user_id, file).await?;
    Ok(Json(video))
}
