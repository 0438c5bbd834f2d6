use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{
    create_upload_temp_file, missing_field, multipart_error, multipart_rejection, parse_video_id,
};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tubely_core::constants::{VIDEO_CONTENT_TYPE, VIDEO_FORM_FIELD};
use tubely_core::{models::Video, AppError};
use tubely_processing::faststart::processing_output_path;
use tubely_processing::{parse_media_type, AspectBucket};
use tubely_storage::keys::prefixed_key;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/videos/{video_id}/video",
    tag = "videos",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded", body = Video),
        (status = 400, description = "Invalid ID, form or content type", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token, or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, headers, multipart),
    fields(operation = "upload_video")
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id: Uuid = parse_video_id(&video_id)?;
    let user_id = state.jwt.authenticate(&headers)?;

    let mut video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user_id) {
        return Err(AppError::Unauthorized("Not authorized to update this video".to_string()).into());
    }

    let mut multipart = multipart.map_err(multipart_rejection)?;
    let mut field = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
            .ok_or_else(|| missing_field(VIDEO_FORM_FIELD))?;
        if field.name() == Some(VIDEO_FORM_FIELD) {
            break field;
        }
    };

    let media_type = field
        .content_type()
        .and_then(parse_media_type)
        .filter(|media_type| media_type == VIDEO_CONTENT_TYPE)
        .ok_or_else(|| AppError::BadRequest("Invalid file type, only MP4 is allowed".to_string()))?;

    let temp_file =
        create_upload_temp_file(state.config.upload_temp_dir().map(std::path::Path::new))?;
    let std_file = temp_file
        .as_file()
        .try_clone()
        .map_err(|e| AppError::internal("Could not write file to disk", e))?;
    let mut file = tokio::fs::File::from_std(std_file);

    let mut size_bytes: u64 = 0;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size_bytes += chunk.len() as u64;
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::internal("Could not write file to disk", e))?;
    }
    file.flush()
        .await
        .map_err(|e| AppError::internal("Could not write file to disk", e))?;
    drop(file);

    tracing::debug!(video_id = %video_id, size_bytes, "Video upload buffered to temp file");

    let aspect_ratio = state
        .media
        .aspect_ratio(temp_file.path())
        .await
        .map_err(|e| AppError::media("Unable to get the aspect ratio", e))?;
    let bucket = AspectBucket::classify(&aspect_ratio, state.config.bucket_policy());

    let processed: Option<TempPath> = if state.config.video_faststart_enabled() {
        match state.media.remux_for_fast_start(temp_file.path()).await {
            Ok(path) => match TempPath::try_from_path(path.clone()) {
                Ok(processed) => Some(processed),
                Err(e) => {
                    let _ = tokio::fs::remove_file(&path).await;
                    return Err(AppError::internal("Couldn't process video for fast start", e).into());
                }
            },
            Err(e) => {
                let _ = tokio::fs::remove_file(processing_output_path(temp_file.path())).await;
                return Err(AppError::media("Couldn't process video for fast start", e).into());
            }
        }
    } else {
        None
    };
    let upload_path = processed.as_deref().unwrap_or(temp_file.path());

    let key = prefixed_key(bucket.prefix(), &state.namer.asset_path(&media_type));
    let url = state
        .objects
        .put_file(&key, upload_path, &media_type)
        .await
        .map_err(|e| AppError::storage("Error uploading file to object store", e))?;

    video.set_video_url(url);
    if let Err(e) = state.videos.update_video(&video).await {
        tracing::warn!(video_id = %video_id, key = %key, "Uploaded object left without a record reference");
        return Err(AppError::internal("Couldn't update video", e).into());
    }

    tracing::info!(
        video_id = %video_id,
        key = %key,
        aspect_ratio = %aspect_ratio,
        size_bytes,
        "Video uploaded"
    );

    Ok(Json(video))
}
