use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::server::AppState;

/// Download a finished video
///
/// Serves a processed video from the output directory as an mp4
/// attachment. File names come from the `output_url` entries of a
/// processing response.
#[utoipa::path(
    get,
    path = "/api/download/{filename}",
    params(
        ("filename" = String, Path, description = "Output file name from a processing response"),
    ),
    responses(
        (status = 200, description = "Video file", content_type = "video/mp4"),
        (status = 400, description = "Invalid file name"),
        (status = 404, description = "No such output file"),
    ),
    tag = "Processing"
)]
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    // Only bare file names are valid; anything that could traverse out of
    // the output directory is rejected outright.
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(ApiError::BadRequest("invalid file name".to_string()));
    }

    let path = state.config.output_dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound);
        }
        Err(e) => {
            return Err(ApiError::Internal(format!("failed to read output: {e}")));
        }
    };

    tracing::debug!(%filename, bytes = bytes.len(), "Serving download");

    let headers = [
        (header::CONTENT_TYPE, "video/mp4".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}
