//! Common utilities for the upload handlers

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use std::path::Path;
use tempfile::NamedTempFile;
use tubely_core::AppError;
use uuid::Uuid;

const TEMP_UPLOAD_PREFIX: &str = "tubely-upload";
const TEMP_UPLOAD_SUFFIX: &str = ".mp4";

/// Parse the `{video_id}` path segment.
pub fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput("Invalid ID".to_string()))
}

/// Map a failure while reading multipart fields. Body limit overruns become
/// 413, everything else 400.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!("Upload too large: {}", err.body_text()));
    }
    AppError::BadRequest(format!("Unable to parse form file: {}", err.body_text()))
}

/// Map a request that is not multipart at all.
pub fn multipart_rejection(rejection: MultipartRejection) -> AppError {
    AppError::BadRequest(format!("Unable to parse form: {}", rejection.body_text()))
}

/// Missing multipart field.
pub fn missing_field(name: &str) -> AppError {
    AppError::BadRequest(format!("Unable to parse form file: missing field '{}'", name))
}

/// Request-scoped temp file for a video upload, in `dir` or the system temp
/// dir. Removed on drop.
pub fn create_upload_temp_file(dir: Option<&Path>) -> Result<NamedTempFile, AppError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_UPLOAD_PREFIX).suffix(TEMP_UPLOAD_SUFFIX);

    let file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    };
    file.map_err(|e| AppError::internal("Couldn't create temp file", e))
}
