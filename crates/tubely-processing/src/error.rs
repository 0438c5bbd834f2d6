use std::path::PathBuf;

/// Failures of the external media tools.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}, stderr: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to parse ffprobe output: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    #[error("No streams found")]
    NoStreams,

    #[error("Invalid video dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Could not stat processed file {path}: {source}")]
    StatOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Processed file is empty: {0}")]
    EmptyOutput(PathBuf),

    #[error("Invalid tool path: {0}")]
    InvalidToolPath(String),
}
