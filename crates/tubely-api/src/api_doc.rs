//! OpenAPI documentation.

use axum::Json;
use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use tubely_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Upload service for Tubely videos. Accepts thumbnail images and MP4 files for existing video records and stores them locally or in S3."
    ),
    paths(
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::video_upload::upload_video,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::Video,
            error::ErrorResponse,
            handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "videos", description = "Video asset uploads"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
