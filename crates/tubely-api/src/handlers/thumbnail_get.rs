use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::parse_video_id;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/thumbnails/{video_id}",
    tag = "thumbnails",
    params(
        ("video_id" = String, Path, description = "ID of the video")
    ),
    responses(
        (status = 200, description = "Thumbnail image bytes (image/png or image/jpeg)"),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Video or thumbnail not found", body = ErrorResponse)
    )
)]
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Response, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let thumbnail = state.thumbnail_ingestor.load(video_id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, thumbnail.content_type),
            (header::CACHE_CONTROL, "no-store"),
        ],
        thumbnail.bytes,
    )
        .into_response())
}
