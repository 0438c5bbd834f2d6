//! Video inspection with ffprobe

use crate::error::MediaError;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tubely_core::BucketPolicy;

/// Pixel dimensions of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn aspect_ratio(&self) -> String {
        calculate_aspect_ratio(self.width, self.height)
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Run `ffprobe -v error -print_format json -show_streams <path>` and read
/// the dimensions of the first video stream.
#[tracing::instrument(fields(
    process.executable.name = "ffprobe",
    process.executable.path = %ffprobe_path,
    ffmpeg.operation = "probe"
))]
pub async fn probe_dimensions(ffprobe_path: &str, path: &Path) -> Result<Dimensions, MediaError> {
    let start = std::time::Instant::now();

    let output = Command::new(ffprobe_path)
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| MediaError::Spawn {
            tool: ffprobe_path.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(MediaError::ToolFailed {
            tool: ffprobe_path.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let dimensions = parse_probe_output(&output.stdout)?;

    tracing::info!(
        duration_ms = start.elapsed().as_millis(),
        width = dimensions.width,
        height = dimensions.height,
        "Video probe completed"
    );

    Ok(dimensions)
}

/// Extract dimensions from ffprobe's JSON document.
///
/// Streams that declare a non-video `codec_type` are skipped; if every stream
/// does, the first one is used and must itself carry dimensions.
pub fn parse_probe_output(stdout: &[u8]) -> Result<Dimensions, MediaError> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)?;

    let first = probe.streams.first().ok_or(MediaError::NoStreams)?;
    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref().map_or(true, |t| t == "video"))
        .unwrap_or(first);

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok(Dimensions { width, height }),
        (width, height) => Err(MediaError::InvalidDimensions {
            width: width.unwrap_or(0),
            height: height.unwrap_or(0),
        }),
    }
}

/// Greatest common divisor, Euclid's algorithm.
pub fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        return a;
    }
    gcd(b, a % b)
}

/// Reduce `width:height` to lowest terms, e.g. 1920x1080 gives `"16:9"`.
pub fn calculate_aspect_ratio(width: u32, height: u32) -> String {
    let divisor = gcd(width, height);
    if divisor == 0 {
        return "0:0".to_string();
    }
    format!("{}:{}", width / divisor, height / divisor)
}

/// Storage bucket a video is filed under, by aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectBucket {
    Landscape,
    Portrait,
    Other,
}

impl AspectBucket {
    pub fn classify(aspect_ratio: &str, policy: BucketPolicy) -> Self {
        match aspect_ratio {
            "16:9" => AspectBucket::Landscape,
            "9:16" => AspectBucket::Portrait,
            _ => match policy {
                BucketPolicy::Distinct => AspectBucket::Other,
                BucketPolicy::LegacyPortrait => AspectBucket::Portrait,
            },
        }
    }

    /// Object key prefix for this bucket.
    pub fn prefix(&self) -> &'static str {
        match self {
            AspectBucket::Landscape => "landscape",
            AspectBucket::Portrait => "portrait",
            AspectBucket::Other => "other",
        }
    }
}
