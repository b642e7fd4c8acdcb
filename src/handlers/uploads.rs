use axum::{
    extract::{multipart::MultipartRejection, Multipart},
    Json,
};

use crate::dto::VideoUploadResponse;
use crate::error::{AppError, AppResult};

const FILE_FIELD: &str = "file";

/// Accepts a video file and reports its metadata. The body is streamed chunk
/// by chunk and discarded; nothing is buffered or written to storage.
pub async fn upload_video(
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<VideoUploadResponse>> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("video/") {
            return Err(AppError::BadRequest("File must be a video".into()));
        }
        let filename = field.file_name().map(str::to_owned);

        let mut size_bytes = 0usize;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            size_bytes += chunk.len();
        }

        tracing::info!(
            filename = filename.as_deref().unwrap_or(""),
            %content_type,
            size_bytes,
            "Video upload received"
        );

        return Ok(Json(VideoUploadResponse {
            message: "Video uploaded successfully".into(),
            filename,
            content_type,
            size_bytes,
            note: "In production, save to S3 or cloud storage".into(),
        }));
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field `{}`",
        FILE_FIELD
    )))
}
