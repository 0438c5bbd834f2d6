use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{missing_field, multipart_error, multipart_rejection, parse_video_id};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tubely_core::constants::THUMBNAIL_FORM_FIELD;
use tubely_core::{models::Video, AppError};
use tubely_storage::keys::thumbnail_file_name;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/videos/{video_id}/thumbnail",
    tag = "videos",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail stored", body = Video),
        (status = 400, description = "Invalid ID, form or content type", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token, not the owner, or record update failed", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, headers, multipart),
    fields(operation = "upload_thumbnail")
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id: Uuid = parse_video_id(&video_id)?;
    let user_id = state.jwt.authenticate(&headers)?;

    tracing::debug!(video_id = %video_id, user_id = %user_id, "Uploading thumbnail");

    let mut multipart = multipart.map_err(multipart_rejection)?;
    let field = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
            .ok_or_else(|| missing_field(THUMBNAIL_FORM_FIELD))?;
        if field.name() == Some(THUMBNAIL_FORM_FIELD) {
            break field;
        }
    };

    let media_type = state.thumbnail_types.validate(field.content_type())?;
    let data = field.bytes().await.map_err(multipart_error)?;

    let mut video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if state.config.thumbnail_require_owner() && !video.is_owned_by(user_id) {
        return Err(AppError::Unauthorized("User does not own the video".to_string()).into());
    }

    let file_name = thumbnail_file_name(video_id, &media_type);
    let url = state
        .assets
        .put(&file_name, data.to_vec(), &media_type)
        .await
        .map_err(|e| AppError::storage("Could not write file to disk", e))?;

    video.set_thumbnail_url(url);
    state.videos.update_video(&video).await.map_err(|e| {
        tracing::warn!(video_id = %video_id, error = %e, "Thumbnail record update failed");
        AppError::Unauthorized("Update call failed".to_string())
    })?;

    tracing::info!(
        video_id = %video_id,
        file = %file_name,
        size_bytes = data.len(),
        "Thumbnail uploaded"
    );

    Ok(Json(video))
}
