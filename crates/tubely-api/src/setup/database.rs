//! Postgres pool for the `videos` table

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tubely_core::Config;

/// Open the pool and confirm the `videos` table is reachable.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;

    sqlx::query("SELECT 1 FROM videos LIMIT 1")
        .execute(&pool)
        .await
        .context("videos table is not reachable")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        acquire_timeout_secs = config.db_timeout_seconds(),
        "Database pool ready"
    );

    Ok(pool)
}
