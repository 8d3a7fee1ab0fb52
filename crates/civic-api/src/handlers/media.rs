use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::warn;

use super::bad_request;
use crate::media::{MediaError, MediaKind, MediaUpload};
use crate::models::{ApiError, ApiResult, ErrorResponse, UploadResponse};
use crate::AppState;

fn media_error(e: MediaError) -> ApiError {
    match e {
        MediaError::Upstream(details) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Upload failed", "UPSTREAM_ERROR").with_details(details)),
        ),
        other => {
            warn!("Upload rejected: {}", other);
            bad_request(other.to_string())
        }
    }
}

/// Pull the `kind` field out of the form and validate it
async fn read_upload(kind: MediaKind, mut multipart: Multipart) -> ApiResult<MediaUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Multipart error: {}", e)))?
    {
        if field.name() != Some(kind.field_name()) {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !kind.accepts(&content_type) {
            return Err(media_error(MediaError::UnsupportedType(content_type)));
        }

        // Reading fails once the body limit is hit.
        let data = field.bytes().await.map_err(|e| {
            bad_request(format!(
                "File too large or unreadable (limit {} bytes): {}",
                kind.max_bytes(),
                e
            ))
        })?;

        return MediaUpload::new(kind, content_type, data.to_vec()).map_err(media_error);
    }

    Err(media_error(MediaError::Missing))
}

async fn relay(
    state: &AppState,
    kind: MediaKind,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let upload = read_upload(kind, multipart).await?;
    let url = state.media.upload(upload).await.map_err(media_error)?;
    Ok(Json(UploadResponse { url }))
}

/// Upload an image (field `image`, up to 5 MiB)
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content_type = "multipart/form-data", description = "Form with an `image` file field"),
    responses(
        (status = 200, description = "Stored image URL", body = UploadResponse),
        (status = 400, description = "Missing, oversized or non-image file", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Media store failure", body = ErrorResponse)
    ),
    tag = "media"
)]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    relay(&state, MediaKind::Image, multipart).await
}

/// Upload a voice note (field `audio`, up to 10 MiB)
#[utoipa::path(
    post,
    path = "/api/upload-audio",
    request_body(content_type = "multipart/form-data", description = "Form with an `audio` file field"),
    responses(
        (status = 200, description = "Stored audio URL", body = UploadResponse),
        (status = 400, description = "Missing, oversized or non-audio file", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Media store failure", body = ErrorResponse)
    ),
    tag = "media"
)]
pub async fn upload_audio(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    relay(&state, MediaKind::Audio, multipart).await
}
