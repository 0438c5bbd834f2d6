use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A row of the `videos` table.
///
/// Uploads only ever touch `video_url`, `thumbnail_url` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl Video {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn set_thumbnail_url(&mut self, url: String) {
        self.thumbnail_url = Some(url);
        self.touch();
    }

    pub fn set_video_url(&mut self, url: String) {
        self.video_url = Some(url);
        self.touch();
    }

    // Postgres timestamptz keeps microseconds, so the new value is truncated to
    // microseconds and is at least one microsecond past the stored one.
    fn touch(&mut self) {
        let now = Utc::now().trunc_subsecs(6);
        let floor = self.updated_at.trunc_subsecs(6) + chrono::Duration::microseconds(1);
        self.updated_at = now.max(floor);
    }
}
