//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use tubely_core::models;

/// Registers the bearer JWT scheme referenced by the upload endpoints.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video and thumbnail ingestion. Uploaded videos are probed, remuxed for progressive playback and published to object storage; thumbnails are stored locally and served under /assets."
    ),
    paths(
        handlers::video_upload::upload_video,
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::thumbnail_get::get_thumbnail,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::Video,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "videos", description = "Video upload and publishing"),
        (name = "thumbnails", description = "Thumbnail upload and retrieval"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
