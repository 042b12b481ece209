//! Per-video processing pipeline.
//!
//! Orchestrates one video through extract -> dither -> reassemble. The
//! dithering pass itself is strictly sequential within a frame (error
//! diffusion chains every pixel to its predecessors), but frames are
//! independent of each other, so the pipeline fans frame work out over a
//! bounded pool of blocking tasks.
//!
//! A job either produces a complete output video or fails with a named
//! error; the first failing frame aborts the whole job so the reassembled
//! video can never silently miss frames.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use palette_dither::{DitherError, Ditherer};
use thiserror::Error;

use super::ffmpeg::{Ffmpeg, VideoError};
use super::frame_codec::{self, CodecError, FrameBuffer};
use crate::models::AppConfig;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Video error: {0}")]
    Video(#[from] VideoError),

    #[error("Frame {frame}: {source}")]
    Frame {
        frame: String,
        #[source]
        source: FrameError,
    },

    #[error("No frames extracted from {0}")]
    NoFrames(PathBuf),

    #[error("Reassembly produced no output at {0}")]
    EmptyOutput(PathBuf),

    #[error("Frame task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What went wrong with a single frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("{0}")]
    Codec(#[from] CodecError),

    #[error("{0}")]
    Dither(#[from] DitherError),
}

/// Generate a unique job identifier (16 hex characters).
pub fn new_job_id() -> String {
    hex::encode(rand::random::<[u8; 8]>())
}

/// List the PNG frames of a working directory in temporal order.
///
/// Frame files are named with zero-padded sequence numbers, so sorting by
/// file name reproduces the order they were extracted in. Reconstruction
/// depends on this ordering.
pub fn sorted_frame_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "png").unwrap_or(false))
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Decode, dither, and re-encode one frame file in place.
fn dither_frame_file(path: &Path, ditherer: &Ditherer) -> Result<(), PipelineError> {
    let frame_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let named = |source: FrameError| PipelineError::Frame {
        frame: frame_name.clone(),
        source,
    };

    let frame = frame_codec::decode_rgb(path).map_err(|e| named(e.into()))?;
    let dithered = ditherer
        .dither(&frame.pixels, frame.width as usize, frame.height as usize)
        .map_err(|e| named(e.into()))?;
    frame_codec::encode_rgb(
        path,
        &FrameBuffer {
            pixels: dithered,
            width: frame.width,
            height: frame.height,
        },
    )
    .map_err(|e| named(e.into()))?;
    Ok(())
}

/// Dither a single still image file (CLI one-shot path).
pub fn dither_image_file(
    input: &Path,
    output: &Path,
    ditherer: &Ditherer,
) -> Result<(), PipelineError> {
    let frame = frame_codec::decode_rgb(input).map_err(|e| PipelineError::Frame {
        frame: input.display().to_string(),
        source: e.into(),
    })?;
    let dithered = ditherer
        .dither(&frame.pixels, frame.width as usize, frame.height as usize)
        .map_err(|e| PipelineError::Frame {
            frame: input.display().to_string(),
            source: e.into(),
        })?;
    frame_codec::encode_rgb(
        output,
        &FrameBuffer {
            pixels: dithered,
            width: frame.width,
            height: frame.height,
        },
    )
    .map_err(|e| PipelineError::Frame {
        frame: output.display().to_string(),
        source: e.into(),
    })?;
    Ok(())
}

/// Video processing service: one call per uploaded video.
#[derive(Clone)]
pub struct VideoPipeline {
    config: Arc<AppConfig>,
    ffmpeg: Ffmpeg,
}

impl VideoPipeline {
    pub fn new(config: Arc<AppConfig>, ffmpeg: Ffmpeg) -> Self {
        Self { config, ffmpeg }
    }

    /// Run the full extract -> dither -> reassemble pipeline for one video.
    ///
    /// The per-job frame directory is removed afterwards whether the job
    /// succeeded or not; only the output video (on success) survives.
    pub async fn process_video(
        &self,
        input: &Path,
        output: &Path,
        ditherer: Arc<Ditherer>,
    ) -> Result<(), PipelineError> {
        let frames_dir = self.config.work_dir.join(format!("job_{}", new_job_id()));
        tokio::fs::create_dir_all(&frames_dir).await?;

        let result = self.run(input, output, ditherer, &frames_dir).await;

        if let Err(e) = tokio::fs::remove_dir_all(&frames_dir).await {
            tracing::warn!(%e, dir = %frames_dir.display(), "Failed to remove frame working directory");
        }
        result
    }

    async fn run(
        &self,
        input: &Path,
        output: &Path,
        ditherer: Arc<Ditherer>,
        frames_dir: &Path,
    ) -> Result<(), PipelineError> {
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::info!(input = %input.display(), fps = self.config.frame_rate, "Extracting frames");
        self.ffmpeg
            .extract_frames(input, frames_dir, self.config.frame_rate)
            .await?;

        let frames = sorted_frame_paths(frames_dir)?;
        if frames.is_empty() {
            return Err(PipelineError::NoFrames(input.to_path_buf()));
        }

        let parallelism = self.config.effective_parallelism();
        tracing::info!(frames = frames.len(), parallelism, "Dithering frames");

        // Fan out across frames, bounded by `parallelism`. Each task owns
        // its frame's buffers exclusively; the shared ditherer is read-only.
        // try_collect aborts on the first frame failure.
        stream::iter(frames.into_iter().map(|path| {
            let ditherer = ditherer.clone();
            async move {
                tokio::task::spawn_blocking(move || dither_frame_file(&path, &ditherer))
                    .await
                    .map_err(|e| PipelineError::Task(e.to_string()))?
            }
        }))
        .buffered(parallelism)
        .try_collect::<Vec<()>>()
        .await?;

        tracing::info!(output = %output.display(), "Reassembling video");
        self.ffmpeg
            .assemble_video(frames_dir, self.config.frame_rate, output)
            .await?;

        // ffmpeg can exit zero and still leave nothing usable behind, e.g.
        // when the frame pattern matched no files. A missing or empty output
        // is a failed job, not a deliverable.
        let metadata = tokio::fs::metadata(output)
            .await
            .map_err(|_| PipelineError::EmptyOutput(output.to_path_buf()))?;
        if metadata.len() == 0 {
            return Err(PipelineError::EmptyOutput(output.to_path_buf()));
        }

        Ok(())
    }
}
