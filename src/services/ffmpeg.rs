//! FFmpeg subprocess wrapper for frame extraction and video reassembly.
//!
//! The core engine only ever sees raw rasters; getting frames out of a
//! video container and back in again is delegated entirely to the `ffmpeg`
//! binary. Frames are written as `frame-%06d.png`, so the zero-padded
//! sequence number makes lexicographic order equal temporal order.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

/// Printf-style pattern ffmpeg uses for frame files in a working directory.
const FRAME_PATTERN: &str = "frame-%06d.png";

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("ffmpeg is not installed or not in PATH")]
    FfmpegMissing(#[source] std::io::Error),

    #[error("ffmpeg {stage} failed: {stderr}")]
    FfmpegFailed { stage: &'static str, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle on the system ffmpeg binary.
///
/// The binary path comes from the `FFMPEG_PATH` environment variable,
/// defaulting to `ffmpeg` on the search path.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    binary: PathBuf,
}

impl Ffmpeg {
    pub fn new() -> Self {
        let binary = std::env::var("FFMPEG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("ffmpeg"));
        Self { binary }
    }

    /// Probe that ffmpeg can actually be executed.
    ///
    /// Called once at startup so a missing binary is reported before the
    /// first upload arrives rather than in the middle of a job.
    pub async fn check_available(&self) -> Result<(), VideoError> {
        let output = Command::new(&self.binary)
            .arg("-version")
            .output()
            .await
            .map_err(VideoError::FfmpegMissing)?;

        if !output.status.success() {
            return Err(VideoError::FfmpegFailed {
                stage: "version probe",
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }

    /// Decompose a video into still PNG frames at the given sampling rate.
    ///
    /// Frames land in `frames_dir` named `frame-000001.png`,
    /// `frame-000002.png`, ... so a lexicographic sort of the directory
    /// reproduces temporal order.
    pub async fn extract_frames(
        &self,
        video: &Path,
        frames_dir: &Path,
        fps: u32,
    ) -> Result<(), VideoError> {
        let output = Command::new(&self.binary)
            .args(["-hide_banner", "-loglevel", "error", "-i"])
            .arg(video)
            .args(["-vf", &format!("fps={fps}")])
            .arg(frames_dir.join(FRAME_PATTERN))
            .output()
            .await
            .map_err(VideoError::FfmpegMissing)?;

        if !output.status.success() {
            return Err(VideoError::FfmpegFailed {
                stage: "frame extraction",
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }

    /// Reassemble the PNG frames in `frames_dir` into an H.264 video.
    ///
    /// Uses `yuv420p` for broad player compatibility and `+faststart` so
    /// the result streams progressively when served over HTTP.
    pub async fn assemble_video(
        &self,
        frames_dir: &Path,
        fps: u32,
        output_path: &Path,
    ) -> Result<(), VideoError> {
        let output = Command::new(&self.binary)
            .args(["-hide_banner", "-loglevel", "error"])
            .args(["-framerate", &fps.to_string(), "-i"])
            .arg(frames_dir.join(FRAME_PATTERN))
            .args([
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-preset",
                "medium",
                "-crf",
                "23",
                "-movflags",
                "+faststart",
                "-y",
            ])
            .arg(output_path)
            .output()
            .await
            .map_err(VideoError::FfmpegMissing)?;

        if !output.status.success() {
            return Err(VideoError::FfmpegFailed {
                stage: "video reassembly",
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new()
    }
}
