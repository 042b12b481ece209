use axum::{
    body::Bytes,
    extract::{Multipart, State},
    response::Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::server::AppState;
use crate::services::pipeline;
use palette_dither::{presets, Ditherer, Palette};

/// One processed upload in a [`ProcessResponse`].
#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessedVideo {
    /// File name of the uploaded source video
    pub source: String,
    /// Download path for the dithered result
    pub output_url: String,
}

/// Response for a successful processing run
#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessResponse {
    /// One entry per uploaded video, in upload order
    pub outputs: Vec<ProcessedVideo>,
}

/// Multipart upload form (documentation only; the handler reads the raw
/// multipart stream). Field names match the wire format.
#[derive(Debug, ToSchema)]
#[allow(dead_code, non_snake_case)]
pub struct ProcessForm {
    /// One or more video files (repeat the field per file)
    #[schema(value_type = String, format = Binary)]
    videos: String,
    /// Error diffusion intensity (default 1.0; values outside 0..=1 allowed)
    #[schema(example = "0.8")]
    ditherIntensity: Option<String>,
    /// Preset palette name (see `/api/palettes`)
    #[schema(example = "gameBoy")]
    paletteType: Option<String>,
    /// Custom palette as a JSON array of hex colors
    #[schema(example = r##"["#000000", "#FFFFFF"]"##)]
    palette: Option<String>,
}

/// Dither one or more uploaded videos down to a palette
///
/// Accepts a multipart form with repeated `videos` file fields plus the
/// dithering parameters. Each video is decomposed into frames, every frame
/// is recolored to the palette with error-diffusion dithering, and the
/// frames are reassembled into a downloadable H.264 video.
#[utoipa::path(
    post,
    path = "/api/process",
    request_body(content = ProcessForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "All videos processed", body = ProcessResponse),
        (status = 400, description = "Missing videos, unknown preset, or malformed palette/intensity"),
        (status = 500, description = "Frame extraction, dithering, or reassembly failed"),
    ),
    tag = "Processing"
)]
pub async fn handle_process(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    let mut videos: Vec<(String, Bytes)> = Vec::new();
    let mut intensity_raw: Option<String> = None;
    let mut preset_name: Option<String> = None;
    let mut palette_spec: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "videos" => {
                let file_name = field.file_name().unwrap_or("upload.mp4").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
                videos.push((file_name, bytes));
            }
            "ditherIntensity" => {
                intensity_raw = Some(read_text_field(field).await?);
            }
            "paletteType" => {
                preset_name = Some(read_text_field(field).await?);
            }
            "palette" => {
                palette_spec = Some(read_text_field(field).await?);
            }
            _ => {}
        }
    }

    if videos.is_empty() {
        return Err(ApiError::MissingField("videos"));
    }

    // Resolve all parameters before any pixel work so bad requests fail
    // without touching the filesystem.
    let intensity = parse_intensity(intensity_raw.as_deref())?;
    let palette = resolve_palette(preset_name.as_deref(), palette_spec.as_deref())?;

    tracing::info!(
        videos = videos.len(),
        palette_colors = palette.len(),
        intensity,
        "Processing upload"
    );

    let ditherer = Arc::new(Ditherer::new(palette).intensity(intensity));
    let job_id = pipeline::new_job_id();

    tokio::fs::create_dir_all(&state.config.work_dir)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to create work dir: {e}")))?;

    let mut outputs = Vec::with_capacity(videos.len());
    for (index, (file_name, bytes)) in videos.into_iter().enumerate() {
        let upload_path = state.config.work_dir.join(format!("upload_{job_id}_{index}"));
        tokio::fs::write(&upload_path, &bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("failed to store upload: {e}")))?;

        let output_name = format!("output_{job_id}_{index}.mp4");
        let output_path = state.config.output_dir.join(&output_name);

        let result = state
            .pipeline
            .process_video(&upload_path, &output_path, ditherer.clone())
            .await;

        if let Err(e) = tokio::fs::remove_file(&upload_path).await {
            tracing::warn!(%e, path = %upload_path.display(), "Failed to remove uploaded video");
        }
        result?;

        tracing::info!(source = %file_name, output = %output_name, "Video processed");
        outputs.push(ProcessedVideo {
            source: file_name,
            output_url: format!("/api/download/{output_name}"),
        });
    }

    Ok(Json(ProcessResponse { outputs }))
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))
}

/// Parse the intensity field. Absent defaults to 1.0 (full diffusion);
/// present values must be finite numbers but are otherwise unconstrained.
fn parse_intensity(raw: Option<&str>) -> Result<f32, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(1.0);
    };
    let value: f32 = raw
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid ditherIntensity: {raw:?}")))?;
    if !value.is_finite() {
        return Err(ApiError::BadRequest(format!(
            "invalid ditherIntensity: {raw:?}"
        )));
    }
    Ok(value)
}

/// Resolve the palette from either a preset name or an explicit color list.
///
/// A present (non-empty) `paletteType` must name a known preset; it does
/// not silently fall back to the explicit list. Without a preset, the
/// `palette` field must hold a JSON array of hex color strings.
fn resolve_palette(
    preset_name: Option<&str>,
    palette_spec: Option<&str>,
) -> Result<Palette, ApiError> {
    if let Some(name) = preset_name.map(str::trim).filter(|s| !s.is_empty()) {
        return presets::preset(name)
            .cloned()
            .ok_or_else(|| ApiError::UnknownPreset(name.to_string()));
    }

    let spec = palette_spec
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingField("paletteType or palette"))?;
    let entries: Vec<String> = serde_json::from_str(spec).map_err(|e| {
        ApiError::BadRequest(format!("palette must be a JSON array of hex colors: {e}"))
    })?;
    Ok(Palette::from_hex(&entries)?)
}
