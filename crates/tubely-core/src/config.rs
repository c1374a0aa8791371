//! Configuration module
//!
//! Process configuration is read from the environment (with an optional `.env`
//! file loaded through dotenvy) and validated once at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_VIDEO_SIZE_MB: usize = 1024;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const TOOL_TIMEOUT_SECS: u64 = 300;
const UPLOAD_TIMEOUT_SECS: u64 = 900;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    /// Public base URL of this service, used for thumbnail URLs.
    pub platform_url: String,
    /// Directory holding thumbnails, served under `/assets`.
    pub assets_root: PathBuf,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, LocalStack)
    pub s3_cf_distribution: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Media processing configuration
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub max_video_size_bytes: usize,
    pub video_allowed_content_types: Vec<String>,
    pub max_thumbnail_size_bytes: usize,
    pub thumbnail_allowed_content_types: Vec<String>,
    pub tool_timeout_secs: u64,
    pub upload_timeout_secs: u64,
    pub staging_dir: PathBuf,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from an arbitrary variable source.
    ///
    /// Does not validate; callers run [`Config::validate`] afterwards.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port: u16 = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_video_size_bytes = megabytes(
            "MAX_VIDEO_SIZE_MB",
            var("MAX_VIDEO_SIZE_MB")
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(MAX_VIDEO_SIZE_MB),
        )?;

        let max_thumbnail_size_bytes = megabytes(
            "MAX_THUMBNAIL_SIZE_MB",
            var("MAX_THUMBNAIL_SIZE_MB")
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(MAX_THUMBNAIL_SIZE_MB),
        )?;

        Ok(Config {
            server_port,
            environment,
            cors_origins,
            database_url: var("DATABASE_URL").unwrap_or_default(),
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: var("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: var("JWT_SECRET").unwrap_or_default(),
            platform_url: var("PLATFORM_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{}", server_port)),
            assets_root: PathBuf::from(var("ASSETS_ROOT").unwrap_or_else(|| "./assets".into())),
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            s3_cf_distribution: var("S3_CF_DISTRIBUTION")
                .map(|s| s.trim_end_matches('/').to_string()),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string()),
            ffmpeg_path: var("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            ffprobe_path: var("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            max_video_size_bytes,
            video_allowed_content_types: parse_list(
                var("VIDEO_ALLOWED_CONTENT_TYPES").as_deref(),
                "video/mp4",
            ),
            max_thumbnail_size_bytes,
            thumbnail_allowed_content_types: parse_list(
                var("THUMBNAIL_ALLOWED_CONTENT_TYPES").as_deref(),
                "image/png,image/jpeg",
            ),
            tool_timeout_secs: var("TOOL_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(TOOL_TIMEOUT_SECS),
            upload_timeout_secs: var("UPLOAD_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(UPLOAD_TIMEOUT_SECS),
            staging_dir: var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET must be set for authentication"));
        }
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_video_size_bytes == 0 || self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Public base URL that uploaded videos are addressed under.
    ///
    /// For S3 this is the CDN distribution when configured, otherwise the
    /// virtual-hosted bucket endpoint.
    pub fn video_public_base(&self) -> String {
        match self.storage_backend {
            StorageBackend::S3 => {
                if let Some(cdn) = &self.s3_cf_distribution {
                    return cdn.clone();
                }
                let bucket = self.s3_bucket.as_deref().unwrap_or_default();
                match (&self.s3_endpoint, &self.s3_region) {
                    (Some(endpoint), _) => {
                        format!("{}/{}", endpoint.trim_end_matches('/'), bucket)
                    }
                    (None, Some(region)) => {
                        format!("https://{}.s3.{}.amazonaws.com", bucket, region)
                    }
                    (None, None) => format!("https://{}.s3.amazonaws.com", bucket),
                }
            }
            StorageBackend::Local => self.local_storage_base_url.clone().unwrap_or_default(),
        }
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}

fn megabytes(name: &str, mb: usize) -> anyhow::Result<usize> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MB", name, mb))
}

fn parse_list(raw: Option<&str>, default: &str) -> Vec<String> {
    raw.unwrap_or(default)
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
