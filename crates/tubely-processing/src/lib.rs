//! Tubely media processing
//!
//! Wraps the external `ffprobe` and `ffmpeg` binaries: reading a video's
//! dimensions, reducing them to an aspect ratio, and remuxing for
//! progressive playback. Handlers reach the tools through `MediaToolkit`.

pub mod error;
pub mod faststart;
pub mod probe;
pub mod toolkit;
pub mod validator;

pub use error::MediaError;
pub use probe::{calculate_aspect_ratio, AspectBucket, Dimensions};
pub use toolkit::{FfmpegToolkit, MediaToolkit};
pub use validator::{parse_media_type, ContentTypeValidator, ValidationError};
