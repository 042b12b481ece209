use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration loaded from an optional YAML file.
///
/// Every field has a sensible default, so the server runs with no
/// configuration at all. Set `CONFIG_FILE` to point at a YAML file to
/// override individual fields.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Directory where finished videos are written and served from
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Scratch directory for uploads and extracted frames
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Frame sampling / reassembly rate in frames per second
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// Number of frames dithered concurrently (default: available cores)
    #[serde(default)]
    pub parallelism: Option<usize>,

    /// Upper bound on upload request size in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("output/frames")
}

fn default_frame_rate() -> u32 {
    30
}

fn default_max_upload_mb() -> usize {
    512
}

impl AppConfig {
    /// Load configuration from the `CONFIG_FILE` environment variable,
    /// falling back to defaults when unset, unreadable, or malformed.
    pub fn load() -> Self {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_from_file(Path::new(&path)),
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific YAML file, defaulting on failure.
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Effective frame-dithering concurrency.
    pub fn effective_parallelism(&self) -> usize {
        self.parallelism.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Upload size limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            work_dir: default_work_dir(),
            frame_rate: default_frame_rate(),
            parallelism: None,
            max_upload_mb: default_max_upload_mb(),
        }
    }
}
