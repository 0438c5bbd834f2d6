//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::PgVideoRepository;
use tubely_processing::FfmpegToolkit;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let (assets, objects) = storage::setup_storage(&config)?;

    let toolkit = FfmpegToolkit::new(
        config.ffmpeg_path().to_string(),
        config.ffprobe_path().to_string(),
    )
    .context("Invalid media tool configuration")?;

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(PgVideoRepository::new(pool)),
        assets,
        objects,
        Arc::new(toolkit),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
