use crate::traits::{validate_key, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::{
    Attribute, Attributes, ObjectStore, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// Object store backed storage
///
/// Wraps any `object_store` implementation. Production uses Amazon S3 (or an
/// S3-compatible endpoint); tests plug in `object_store::memory::InMemory`.
#[derive(Clone)]
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    public_base_url: String,
}

impl ObjectStorage {
    /// Wrap an existing store. Object URLs are `{public_base_url}/{key}`.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        ObjectStorage {
            store,
            bucket: bucket.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build an S3 backed storage
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_base_url` - CDN or distribution base for object URLs. When
    ///   absent the bucket's own URL is used.
    pub fn s3(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let public_base_url = public_base_url
            .unwrap_or_else(|| bucket_url(&bucket, &region, endpoint_url.as_deref()));

        Ok(Self::new(Arc::new(store), bucket, public_base_url))
    }

    async fn put_payload(
        &self,
        storage_key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;

        let size = bytes.len();
        let location = ObjectPath::from(storage_key);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(bytes), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        Ok(self.public_url(storage_key))
    }
}

/// URL of an object in the bucket itself, used when no CDN base is configured.
///
/// Custom endpoints use path-style addressing: `{endpoint}/{bucket}`.
fn bucket_url(bucket: &str, region: &str, endpoint_url: Option<&str>) -> String {
    match endpoint_url {
        Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
        None => format!("https://{}.s3.{}.amazonaws.com", bucket, region),
    }
}

#[async_trait]
impl Storage for ObjectStorage {
    async fn put(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        self.put_payload(storage_key, Bytes::from(data), content_type)
            .await
    }

    async fn put_file(
        &self,
        storage_key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<String> {
        let data = fs::read(source).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to read {}: {}", source.display(), e))
        })?;
        self.put_payload(storage_key, Bytes::from(data), content_type)
            .await
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.public_base_url, storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
