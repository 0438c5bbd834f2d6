use crate::error::MediaError;
use crate::faststart::process_for_fast_start;
use crate::probe::{probe_dimensions, Dimensions};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Media tooling used by the upload handlers.
#[async_trait]
pub trait MediaToolkit: Send + Sync {
    /// Dimensions of the first video stream in the file at `path`.
    async fn probe(&self, path: &Path) -> Result<Dimensions, MediaError>;

    /// Remux `path` for fast start, returning the path of the new file.
    async fn remux_for_fast_start(&self, path: &Path) -> Result<PathBuf, MediaError>;

    /// Reduced `w:h` aspect ratio of the file at `path`.
    async fn aspect_ratio(&self, path: &Path) -> Result<String, MediaError> {
        Ok(self.probe(path).await?.aspect_ratio())
    }
}

/// Validate that a tool path doesn't contain shell metacharacters
fn validate_tool_path(path: &str) -> Result<(), MediaError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() || path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(MediaError::InvalidToolPath(path.to_string()));
    }
    Ok(())
}

/// Toolkit backed by the ffmpeg and ffprobe executables.
#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegToolkit {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> Result<Self, MediaError> {
        validate_tool_path(&ffmpeg_path)?;
        validate_tool_path(&ffprobe_path)?;
        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
        })
    }
}

#[async_trait]
impl MediaToolkit for FfmpegToolkit {
    async fn probe(&self, path: &Path) -> Result<Dimensions, MediaError> {
        probe_dimensions(&self.ffprobe_path, path).await
    }

    async fn remux_for_fast_start(&self, path: &Path) -> Result<PathBuf, MediaError> {
        process_for_fast_start(&self.ffmpeg_path, path).await
    }
}
