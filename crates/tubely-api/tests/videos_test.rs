mod helpers;

use axum::http::StatusCode;
use helpers::*;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, ObjectStore, ObjectStoreExt};
use tubely_core::models::Video;
use tubely_core::BucketPolicy;
use uuid::Uuid;

const MP4_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isom";

async fn object_count(app: &TestApp) -> usize {
    app.objects
        .list_with_delimiter(None)
        .await
        .unwrap()
        .common_prefixes
        .len()
}

fn object_key(url: &str) -> &str {
    url.strip_prefix(TEST_CDN)
        .and_then(|rest| rest.strip_prefix('/'))
        .expect("video url should point at the CDN")
}

#[tokio::test]
async fn test_upload_landscape_video() {
    let app = setup_test_app();
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);

    let response = app
        .client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Video = response.json();
    assert!(body.updated_at > video.updated_at);
    assert_eq!(body.thumbnail_url, None);

    let url = body.video_url.clone().expect("video_url should be set");
    let key = object_key(&url);
    let (prefix, name) = key.split_once('/').unwrap();
    assert_eq!(prefix, "landscape");
    assert!(name.ends_with(".mp4"));
    assert_eq!(name.len(), 22 + ".mp4".len());
    assert!(!name.contains('/'));

    let object = app.objects.get(&ObjectPath::from(key)).await.unwrap();
    assert_eq!(
        object
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| -> &str { v.as_ref() }),
        Some("video/mp4")
    );
    assert_eq!(object.bytes().await.unwrap().as_ref(), MP4_BYTES);

    assert_eq!(app.videos.get(video.id).unwrap().video_url, body.video_url);
    assert_eq!(app.toolkit.remux_count(), 1);
}

#[tokio::test]
async fn test_uploads_get_distinct_keys() {
    let app = setup_test_app();
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);

    let mut urls = Vec::new();
    for _ in 0..2 {
        let response = app
            .client()
            .post(&video_path(video.id))
            .add_header("Authorization", bearer(owner))
            .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        urls.push(response.json::<Video>().video_url.unwrap());
    }

    assert_ne!(urls[0], urls[1]);
}

#[tokio::test]
async fn test_portrait_video_goes_to_portrait_prefix() {
    let app = setup_test_app();
    app.toolkit.set_dimensions(1080, 1920);
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);

    let response = app
        .client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let url = response.json::<Video>().video_url.unwrap();
    assert!(object_key(&url).starts_with("portrait/"));
}

#[tokio::test]
async fn test_other_ratio_goes_to_other_prefix() {
    let app = setup_test_app();
    app.toolkit.set_dimensions(640, 480);
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);

    let response = app
        .client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let url = response.json::<Video>().video_url.unwrap();
    assert!(object_key(&url).starts_with("other/"));
}

#[tokio::test]
async fn test_other_ratio_uses_portrait_prefix_under_legacy_policy() {
    let app = setup_test_app_with(|config| config.bucket_policy = BucketPolicy::LegacyPortrait);
    app.toolkit.set_dimensions(640, 480);
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);

    let response = app
        .client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let url = response.json::<Video>().video_url.unwrap();
    assert!(object_key(&url).starts_with("portrait/"));
}

#[tokio::test]
async fn test_fast_start_can_be_disabled() {
    let app = setup_test_app_with(|config| config.video_faststart_enabled = false);
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);

    let response = app
        .client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(app.toolkit.remux_count(), 0);
    assert_eq!(app.toolkit.probe_count(), 1);
    let url = response.json::<Video>().video_url.unwrap();
    let object = app.objects.get(&ObjectPath::from(object_key(&url))).await.unwrap();
    assert_eq!(object.bytes().await.unwrap().as_ref(), MP4_BYTES);
}

#[tokio::test]
async fn test_non_mp4_is_rejected() {
    let app = setup_test_app();
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);

    let response = app
        .client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("video", b"webm", "boots.webm", "video/webm"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid file type, only MP4 is allowed");
    assert_eq!(app.videos.get(video.id).unwrap(), video);
    assert_eq!(object_count(&app).await, 0);
    assert_eq!(app.toolkit.probe_count(), 0);
}

#[tokio::test]
async fn test_non_owner_is_unauthorized() {
    let app = setup_test_app();
    let video = seed_video(&app, Uuid::new_v4());

    let response = app
        .client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(object_count(&app).await, 0);
    assert_eq!(app.videos.update_count(), 0);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = setup_test_app();
    let video = seed_video(&app, Uuid::new_v4());

    let response = app
        .client()
        .post(&video_path(video.id))
        .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_video_is_not_found() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&video_path(Uuid::new_v4()))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(object_count(&app).await, 0);
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/videos/1234/video")
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let app = setup_test_app();
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);

    let response = app
        .client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("file", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fast_start_failure_is_internal_error() {
    let app = setup_test_app();
    app.toolkit.fail_remux();
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);

    let response = app
        .client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Couldn't process video for fast start");
    assert_eq!(object_count(&app).await, 0);
    assert!(app.videos.get(video.id).unwrap().video_url.is_none());
    // Neither the upload nor the partial remux output survives the request
    assert_eq!(app.upload_leftovers(), Vec::<String>::new());
}

#[tokio::test]
async fn test_record_update_failure_is_internal_error() {
    let app = setup_test_app();
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);
    app.videos.fail_updates();

    let response = app
        .client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Couldn't update video");
    // The object stays in the store without a record pointing at it
    assert_eq!(object_count(&app).await, 1);
    assert_eq!(app.upload_leftovers(), Vec::<String>::new());
}

#[tokio::test]
async fn test_oversized_video_is_rejected() {
    let app = setup_test_app_with(|config| config.video_max_upload_bytes = 1024);
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);

    let response = app
        .client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("video", &vec![0u8; 8192], "boots.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(object_count(&app).await, 0);
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app();

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_openapi_document_lists_upload_routes() {
    let app = setup_test_app();

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/api/videos/{video_id}/video"].is_object());
    assert!(body["paths"]["/api/videos/{video_id}/thumbnail"].is_object());
}

#[tokio::test]
async fn test_upload_scratch_files_removed_on_every_outcome() {
    let app = setup_test_app();
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);
    let upload = || {
        app.client()
            .post(&video_path(video.id))
            .add_header("Authorization", bearer(owner))
            .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
    };

    upload().await.assert_status_ok();
    assert_eq!(app.upload_leftovers(), Vec::<String>::new());

    app.toolkit.fail_remux();
    assert_eq!(upload().await.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.upload_leftovers(), Vec::<String>::new());

    let response = app
        .client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("video", b"webm", "boots.webm", "video/webm"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.upload_leftovers(), Vec::<String>::new());
}

#[tokio::test]
async fn test_upload_scratch_file_removed_without_fast_start() {
    let app = setup_test_app_with(|config| config.video_faststart_enabled = false);
    let owner = Uuid::new_v4();
    let video = seed_video(&app, owner);

    app.client()
        .post(&video_path(video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("video", MP4_BYTES, "boots.mp4", "video/mp4"))
        .await
        .assert_status_ok();

    assert_eq!(app.upload_leftovers(), Vec::<String>::new());
}
