//! Configuration module
//!
//! Settings are read from the environment (a `.env` file is honoured) into a
//! `ServerConfig`, wrapped by `Config` which exposes read-only getters.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use crate::constants::{DEFAULT_THUMBNAIL_MAX_UPLOAD_BYTES, DEFAULT_VIDEO_MAX_UPLOAD_BYTES};
use crate::storage_types::{BucketPolicy, StorageBackend};

const DEFAULT_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Local assets (thumbnails)
    pub assets_root: String,
    pub assets_base_url: String,
    // Video object storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub s3_public_base_url: Option<String>, // CDN / distribution base for object URLs
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Media tooling
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub upload_temp_dir: Option<String>, // Scratch dir for video uploads; system temp dir when unset
    pub video_faststart_enabled: bool,
    pub bucket_policy: BucketPolicy,
    // Upload limits and policies
    pub video_max_upload_bytes: usize,
    pub thumbnail_max_upload_bytes: usize,
    pub thumbnail_allowed_content_types: Vec<String>,
    pub thumbnail_require_owner: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServerConfig>);

impl Config {
    pub fn new(config: ServerConfig) -> Self {
        Config(Box::new(config))
    }

    fn inner(&self) -> &ServerConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServerConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().jwt_secret
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().db_timeout_seconds
    }

    pub fn assets_root(&self) -> &str {
        &self.inner().assets_root
    }

    pub fn assets_base_url(&self) -> &str {
        &self.inner().assets_base_url
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn s3_public_base_url(&self) -> Option<&str> {
        self.inner().s3_public_base_url.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    pub fn upload_temp_dir(&self) -> Option<&str> {
        self.inner().upload_temp_dir.as_deref()
    }

    pub fn video_faststart_enabled(&self) -> bool {
        self.inner().video_faststart_enabled
    }

    pub fn bucket_policy(&self) -> BucketPolicy {
        self.inner().bucket_policy
    }

    pub fn video_max_upload_bytes(&self) -> usize {
        self.inner().video_max_upload_bytes
    }

    pub fn thumbnail_max_upload_bytes(&self) -> usize {
        self.inner().thumbnail_max_upload_bytes
    }

    pub fn thumbnail_allowed_content_types(&self) -> &[String] {
        &self.inner().thumbnail_allowed_content_types
    }

    pub fn thumbnail_require_owner(&self) -> bool {
        self.inner().thumbnail_require_owner
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

/// Parse a boolean setting. Unset falls back to `default`; anything set but
/// not recognised is an error.
fn parse_flag(name: &str, raw: Option<&str>, default: bool) -> Result<bool, anyhow::Error> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!(
            "{} must be one of true/false/1/0/yes/no/on/off, got '{}'",
            name,
            other
        )),
    }
}

/// Parse a numeric setting. Unset falls back to `default`; anything set but
/// unparseable is an error.
fn parse_number<T>(name: &str, raw: Option<&str>, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} must be a valid number, got '{}': {}", name, raw, e)),
    }
}

fn env_flag(name: &str, default: bool) -> Result<bool, anyhow::Error> {
    parse_flag(name, env::var(name).ok().as_deref(), default)
}

fn env_number<T>(name: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: Display,
{
    parse_number(name, env::var(name).ok().as_deref(), default)
}

fn env_list(name: &str, default: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port: u16 = env_number("PORT", DEFAULT_PORT)?;

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::S3,
        };

        let bucket_policy = match env::var("VIDEO_OTHER_BUCKET") {
            Ok(value) => value.parse()?,
            Err(_) => BucketPolicy::default(),
        };

        let assets_root = env::var("ASSETS_ROOT").unwrap_or_else(|_| "assets".to_string());
        let assets_base_url = env::var("ASSETS_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}/assets", server_port));

        Ok(ServerConfig {
            server_port,
            environment,
            cors_origins,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env_number("DB_MAX_CONNECTIONS", MAX_CONNECTIONS)?,
            db_timeout_seconds: env_number("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS)?,
            assets_root,
            assets_base_url,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            s3_public_base_url: env::var("S3_PUBLIC_BASE_URL")
                .or_else(|_| env::var("S3_CF_DISTRIBUTION"))
                .ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            upload_temp_dir: env::var("UPLOAD_TEMP_DIR").ok(),
            video_faststart_enabled: env_flag("VIDEO_FASTSTART_ENABLED", true)?,
            bucket_policy,
            video_max_upload_bytes: env_number(
                "VIDEO_MAX_UPLOAD_BYTES",
                DEFAULT_VIDEO_MAX_UPLOAD_BYTES,
            )?,
            thumbnail_max_upload_bytes: env_number(
                "THUMBNAIL_MAX_UPLOAD_BYTES",
                DEFAULT_THUMBNAIL_MAX_UPLOAD_BYTES,
            )?,
            thumbnail_allowed_content_types: env_list(
                "THUMBNAIL_ALLOWED_CONTENT_TYPES",
                "image/jpeg,image/png",
            ),
            thumbnail_require_owner: env_flag("THUMBNAIL_REQUIRE_OWNER", true)?,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET must not be empty"));
        }

        if is_production_env(&self.environment)
            && self.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN
        {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long in production",
                MIN_PRODUCTION_SECRET_LEN
            ));
        }

        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.assets_root.trim().is_empty() {
            return Err(anyhow::anyhow!("ASSETS_ROOT must not be empty"));
        }

        if self.thumbnail_allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_ALLOWED_CONTENT_TYPES must list at least one media type"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
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
}
