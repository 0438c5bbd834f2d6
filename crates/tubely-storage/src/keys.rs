//! Asset naming shared by every storage backend.
//!
//! Names are `{random_id}{ext}` where the id is 128 bits of entropy encoded
//! as URL-safe base64 without padding (22 characters), and the extension is
//! taken from the declared media type.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::TryRngCore;
use std::sync::Arc;
use tubely_core::constants::{ASSET_ID_BYTES, FALLBACK_EXTENSION};

/// Source of random bytes for asset ids.
pub trait EntropySource: Send + Sync {
    fn fill(&self, buf: &mut [u8]);
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) {
        // Nothing sensible can be named without entropy.
        if let Err(e) = OsRng.try_fill_bytes(buf) {
            panic!("OS random source unavailable: {}", e);
        }
    }
}

/// Map a media type to a file extension.
///
/// `image/png` becomes `.png`. Anything that does not split into exactly
/// two `/`-separated parts becomes `.bin`. The subtype is used verbatim.
pub fn media_type_to_ext(media_type: &str) -> String {
    let parts: Vec<&str> = media_type.split('/').collect();
    if parts.len() != 2 {
        return FALLBACK_EXTENSION.to_string();
    }
    format!(".{}", parts[1])
}

/// Object key for a video stored under a bucket prefix.
pub fn prefixed_key(prefix: &str, asset_path: &str) -> String {
    format!("{}/{}", prefix, asset_path)
}

/// File name for a video's thumbnail.
pub fn thumbnail_file_name(video_id: impl std::fmt::Display, media_type: &str) -> String {
    format!("{}{}", video_id, media_type_to_ext(media_type))
}

/// Generates fresh asset names.
#[derive(Clone)]
pub struct AssetNamer {
    entropy: Arc<dyn EntropySource>,
}

impl Default for AssetNamer {
    fn default() -> Self {
        Self::new(Arc::new(OsEntropy))
    }
}

impl AssetNamer {
    pub fn new(entropy: Arc<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    /// A new random id, never reused.
    pub fn random_id(&self) -> String {
        let mut buf = [0u8; ASSET_ID_BYTES];
        self.entropy.fill(&mut buf);
        URL_SAFE_NO_PAD.encode(buf)
    }

    /// Random asset name with an extension derived from `media_type`.
    pub fn asset_path(&self, media_type: &str) -> String {
        format!("{}{}", self.random_id(), media_type_to_ext(media_type))
    }
}
