//! Constants shared across crates.

/// Only media type accepted by the video upload endpoint.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Multipart field carrying the video payload.
pub const VIDEO_FORM_FIELD: &str = "video";

/// Multipart field carrying the thumbnail payload.
pub const THUMBNAIL_FORM_FIELD: &str = "thumbnail";

/// Fixed ceiling for video request bodies (1 GiB).
pub const DEFAULT_VIDEO_MAX_UPLOAD_BYTES: usize = 1 << 30;

/// In-memory ceiling for thumbnail request bodies (10 MiB).
pub const DEFAULT_THUMBNAIL_MAX_UPLOAD_BYTES: usize = 10 << 20;

/// Extension used when a media type cannot be split into `type/subtype`.
pub const FALLBACK_EXTENSION: &str = ".bin";

/// Bytes of entropy in a generated asset id (128 bits).
pub const ASSET_ID_BYTES: usize = 16;
