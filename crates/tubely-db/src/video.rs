use tubely_core::{models::Video, AppError};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Record store for video rows.
#[async_trait::async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch a video by id. `Ok(None)` when no such row exists.
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Persist the mutable fields of an existing video.
    async fn update_video(&self, video: &Video) -> Result<(), AppError>;
}

/// Postgres-backed video repository
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            SELECT id, user_id, title, description, created_at, updated_at,
                   video_url, thumbnail_url
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "update", db.record_id = %video.id))]
    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET video_url = $2, thumbnail_url = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(video.id)
        .bind(&video.video_url)
        .bind(&video.thumbnail_url)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(video_id = %video.id, "Update matched no rows");
            let err = anyhow::anyhow!("Video {} no longer exists", video.id);
            return Err(AppError::internal(err.to_string(), err));
        }

        Ok(())
    }
}
