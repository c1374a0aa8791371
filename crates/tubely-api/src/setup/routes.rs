//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::Config;
use utoipa::OpenApi;

/// Allowance for multipart boundaries and part headers on top of the media limit.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let video_body_limit = state
        .video_ingestor
        .max_file_size()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let thumbnail_body_limit = state
        .thumbnail_ingestor
        .max_file_size()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let assets = ServeDir::new(state.thumbnail_ingestor.assets_root());

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/openapi.json", get(openapi_json))
        .route(
            "/api/video_upload/{video_id}",
            post(handlers::video_upload::upload_video)
                .layer(DefaultBodyLimit::max(video_body_limit)),
        )
        .route(
            "/api/thumbnail_upload/{video_id}",
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(thumbnail_body_limit)),
        )
        .route(
            "/api/thumbnails/{video_id}",
            get(handlers::thumbnail_get::get_thumbnail),
        )
        .nest_service("/assets", assets)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
