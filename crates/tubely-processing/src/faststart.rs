//! Fast-start remuxing
//!
//! Moves the MP4 index (moov atom) ahead of the media data so playback can
//! begin before the whole file is downloaded. Streams are copied, not
//! re-encoded.

use crate::error::MediaError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

const OUTPUT_SUFFIX: &str = ".processing";

/// Sibling path the remuxed file is written to: `<input>.processing`.
pub fn processing_output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

/// Run `ffmpeg -i <input> -movflags faststart -codec copy -f mp4 <input>.processing`.
///
/// On success the output exists and is non-empty. The caller owns both the
/// input and the output file.
#[tracing::instrument(fields(
    process.executable.name = "ffmpeg",
    process.executable.path = %ffmpeg_path,
    ffmpeg.operation = "faststart"
))]
pub async fn process_for_fast_start(ffmpeg_path: &str, input: &Path) -> Result<PathBuf, MediaError> {
    let start = std::time::Instant::now();
    let output_path = processing_output_path(input);

    let output = Command::new(ffmpeg_path)
        .arg("-i")
        .arg(input)
        .args(["-movflags", "faststart", "-codec", "copy", "-f", "mp4"])
        .arg(&output_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| MediaError::Spawn {
            tool: ffmpeg_path.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::warn!(status = %output.status, stderr = %stderr, "FFmpeg fast-start failed");
        return Err(MediaError::ToolFailed {
            tool: ffmpeg_path.to_string(),
            status: output.status.to_string(),
            stderr,
        });
    }

    let metadata = tokio::fs::metadata(&output_path)
        .await
        .map_err(|source| MediaError::StatOutput {
            path: output_path.clone(),
            source,
        })?;

    if metadata.len() == 0 {
        return Err(MediaError::EmptyOutput(output_path));
    }

    tracing::info!(
        duration_ms = start.elapsed().as_millis(),
        size_bytes = metadata.len(),
        output = %output_path.display(),
        "Fast-start remux completed"
    );

    Ok(output_path)
}
