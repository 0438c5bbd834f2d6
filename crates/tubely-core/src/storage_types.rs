use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// Selects where uploaded video objects are written. Thumbnails always go to
/// the local assets directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Which key prefix a video outside the 16:9 and 9:16 buckets is filed under.
///
/// `Distinct` files it under `other/`. `LegacyPortrait` files it under
/// `portrait/`, matching keys written by earlier deployments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BucketPolicy {
    #[default]
    Distinct,
    LegacyPortrait,
}

impl FromStr for BucketPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "other" | "distinct" => Ok(BucketPolicy::Distinct),
            "portrait" | "legacy" => Ok(BucketPolicy::LegacyPortrait),
            _ => Err(anyhow::anyhow!("Invalid bucket policy: {}", s)),
        }
    }
}
