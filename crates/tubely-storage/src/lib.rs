//! Tubely Storage Library
//!
//! Storage abstraction for uploaded media. Video objects go to an object
//! store (S3 or any `object_store` backend) or the local filesystem;
//! thumbnails always go to the local assets directory.
//!
//! # Key format
//!
//! - Video objects: `{bucket}/{random_id}{ext}` where bucket is one of
//!   `landscape`, `portrait`, `other`.
//! - Thumbnails: `{video_id}{ext}` directly under the assets root.
//!
//! Keys must not contain `..` or a leading `/`. Name generation lives in the
//! `keys` module so every backend sees the same layout.

pub mod factory;
pub mod keys;
pub mod local;
pub mod object;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_assets_storage, create_storage};
pub use keys::{media_type_to_ext, AssetNamer, EntropySource, OsEntropy};
pub use local::LocalStorage;
pub use object::ObjectStorage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
