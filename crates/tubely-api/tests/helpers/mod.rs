//! Test helpers: build AppState and router for integration tests.
//!
//! The record store is an in-memory repository, video objects go to
//! `object_store::memory::InMemory`, thumbnails to a temp dir, and the media
//! tools are faked.

#![allow(dead_code)]

pub mod fakes;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use fakes::{FakeToolkit, InMemoryVideoRepository};
use object_store::memory::InMemory;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::auth::issue_token;
use tubely_api::setup::routes;
use tubely_api::state::AppState;
use tubely_core::constants::{DEFAULT_THUMBNAIL_MAX_UPLOAD_BYTES, DEFAULT_VIDEO_MAX_UPLOAD_BYTES};
use tubely_core::models::Video;
use tubely_core::{BucketPolicy, Config, ServerConfig, StorageBackend};
use tubely_storage::{LocalStorage, ObjectStorage};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";
pub const TEST_CDN: &str = "https://d111111abcdef8.cloudfront.net";

/// Test application: server plus handles on every fake it was built with.
pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<InMemoryVideoRepository>,
    pub objects: Arc<InMemory>,
    pub toolkit: Arc<FakeToolkit>,
    pub assets_dir: TempDir,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Files left behind in the upload scratch directory.
    pub fn upload_leftovers(&self) -> Vec<String> {
        std::fs::read_dir(self.upload_dir.path())
            .expect("Failed to read upload directory")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

pub fn test_config(assets_root: &str) -> ServerConfig {
    ServerConfig {
        server_port: 8091,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        jwt_secret: TEST_JWT_SECRET.to_string(),
        database_url: "postgres://tubely@localhost/tubely".to_string(),
        db_max_connections: 5,
        db_timeout_seconds: 30,
        assets_root: assets_root.to_string(),
        assets_base_url: "http://localhost:8091/assets".to_string(),
        storage_backend: StorageBackend::S3,
        s3_bucket: Some("tubely-test".to_string()),
        s3_region: Some("us-east-2".to_string()),
        s3_endpoint: None,
        aws_region: None,
        s3_public_base_url: Some(TEST_CDN.to_string()),
        local_storage_path: None,
        local_storage_base_url: None,
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        upload_temp_dir: None,
        video_faststart_enabled: true,
        bucket_policy: BucketPolicy::Distinct,
        video_max_upload_bytes: DEFAULT_VIDEO_MAX_UPLOAD_BYTES,
        thumbnail_max_upload_bytes: DEFAULT_THUMBNAIL_MAX_UPLOAD_BYTES,
        thumbnail_allowed_content_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
        thumbnail_require_owner: true,
    }
}

/// Setup a test app with default configuration.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {})
}

/// Setup a test app after letting the caller adjust the configuration.
pub fn setup_test_app_with(configure: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let assets_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let upload_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let mut server_config = test_config(&assets_dir.path().to_string_lossy());
    server_config.upload_temp_dir = Some(upload_dir.path().to_string_lossy().into_owned());
    configure(&mut server_config);
    let config = Config::new(server_config);

    let videos = Arc::new(InMemoryVideoRepository::default());
    let objects = Arc::new(InMemory::new());
    let toolkit = Arc::new(FakeToolkit::new(1920, 1080));

    let assets = Arc::new(LocalStorage::new(
        config.assets_root(),
        config.assets_base_url(),
    ));
    let object_storage = Arc::new(ObjectStorage::new(
        objects.clone(),
        "tubely-test",
        TEST_CDN,
    ));

    let state = Arc::new(AppState::new(
        config.clone(),
        videos.clone(),
        assets,
        object_storage,
        toolkit.clone(),
    ));

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        videos,
        objects,
        toolkit,
        assets_dir,
        upload_dir,
    }
}

/// Bearer header value for `user_id`.
pub fn bearer(user_id: Uuid) -> String {
    let token = issue_token(TEST_JWT_SECRET, user_id, Duration::hours(1))
        .expect("Failed to sign test token");
    format!("Bearer {}", token)
}

/// Insert a video owned by `owner` and return it.
pub fn seed_video(app: &TestApp, owner: Uuid) -> Video {
    let created = Utc::now() - Duration::minutes(5);
    let video = Video {
        id: Uuid::new_v4(),
        user_id: owner,
        title: "Boots".to_string(),
        description: "The boots of Ember Crest".to_string(),
        created_at: created,
        updated_at: created,
        video_url: None,
        thumbnail_url: None,
    };
    app.videos.insert(video.clone());
    video
}

pub fn file_form(field: &str, data: &[u8], file_name: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::copy_from_slice(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string());
    MultipartForm::new().add_part(field.to_string(), part)
}

pub fn thumbnail_path(video_id: Uuid) -> String {
    format!("/api/videos/{}/thumbnail", video_id)
}

pub fn video_path(video_id: Uuid) -> String {
    format!("/api/videos/{}/video", video_id)
}
