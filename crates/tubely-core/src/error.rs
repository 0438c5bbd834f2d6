//! Error types module
//!
//! All handler-facing failures are unified under `AppError`. Each variant
//! describes its own HTTP presentation through `ErrorMetadata`, so the API
//! layer only has to render it. Dependency failures carry a fixed client
//! message and keep the underlying error as their `source` for logs only.
//!
//! The `Database` variant carries a `sqlx::Error` when the `sqlx` feature is
//! enabled and a plain message otherwise.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like oversized bodies
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("{message}")]
    Storage {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{message}")]
    MediaProcessing {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl AppError {
    /// Wrap an underlying failure with a client-safe message.
    pub fn internal(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::InternalWithSource {
            message: message.into(),
            source: source.into(),
        }
    }

    /// A storage backend failure, shown to the client as `message`.
    pub fn storage(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::Storage {
            message: message.into(),
            source: source.into(),
        }
    }

    /// An ffprobe or ffmpeg failure, shown to the client as `message`.
    pub fn media(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::MediaProcessing {
            message: message.into(),
            source: source.into(),
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

/// Static metadata for each variant: (http_status, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, LogLevel) {
    match err {
        AppError::Database(_) => (500, LogLevel::Error),
        AppError::Storage { .. } => (500, LogLevel::Error),
        AppError::MediaProcessing { .. } => (500, LogLevel::Error),
        AppError::InvalidInput(_) => (400, LogLevel::Debug),
        AppError::BadRequest(_) => (400, LogLevel::Debug),
        AppError::NotFound(_) => (404, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, LogLevel::Warn),
        AppError::Internal(_) => (500, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, LogLevel::Error),
        AppError::Unauthorized(_) => (401, LogLevel::Debug),
    }
}

impl AppError {
    /// Get the error type name for logs
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage { .. } => "Storage",
            AppError::MediaProcessing { .. } => "MediaProcessing",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
            AppError::Unauthorized(_) => "Unauthorized",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage { ref message, .. } => message.clone(),
            AppError::MediaProcessing { ref message, .. } => message.clone(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { ref message, .. } => message.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
        }
    }
}
