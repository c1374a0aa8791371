//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;

    let storage = tubely_storage::create_storage(&config)
        .await
        .context("Failed to initialize object storage")?;

    let state = services::initialize_services(&config, pool, storage).await?;

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
