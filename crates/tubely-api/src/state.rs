//! Application state shared by every handler.

use crate::auth::JwtValidator;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{ContentTypeValidator, MediaToolkit};
use tubely_storage::{AssetNamer, Storage};

/// Immutable per-process state. Every collaborator sits behind a trait so
/// tests can swap in in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub jwt: JwtValidator,
    pub videos: Arc<dyn VideoRepository>,
    /// Local assets directory thumbnails are written to.
    pub assets: Arc<dyn Storage>,
    /// Object store video files are uploaded to.
    pub objects: Arc<dyn Storage>,
    pub media: Arc<dyn MediaToolkit>,
    pub namer: AssetNamer,
    pub thumbnail_types: ContentTypeValidator,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoRepository>,
        assets: Arc<dyn Storage>,
        objects: Arc<dyn Storage>,
        media: Arc<dyn MediaToolkit>,
    ) -> Self {
        let jwt = JwtValidator::new(config.jwt_secret());
        let thumbnail_types =
            ContentTypeValidator::new(config.thumbnail_allowed_content_types().to_vec());

        AppState {
            config,
            jwt,
            videos,
            assets,
            objects,
            media,
            namer: AssetNamer::default(),
            thumbnail_types,
        }
    }
}
