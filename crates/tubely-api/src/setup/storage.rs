//! Storage setup and initialization

use anyhow::Result;
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{create_assets_storage, create_storage, Storage};

/// Setup the assets storage (thumbnails) and the object storage (videos).
pub fn setup_storage(config: &Config) -> Result<(Arc<dyn Storage>, Arc<dyn Storage>)> {
    tracing::info!("Initializing storage abstraction...");

    let assets = create_assets_storage(config);
    let objects = create_storage(config)?;

    tracing::info!(
        assets_root = %config.assets_root(),
        assets_base_url = %config.assets_base_url(),
        backend = %objects.backend_type(),
        bucket_policy = ?config.bucket_policy(),
        "Storage abstraction initialized successfully"
    );

    Ok((assets, objects))
}
