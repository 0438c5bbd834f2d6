//! Database access for Tubely
//!
//! The video record store is consumed through `VideoRepository`. The
//! Postgres implementation reads and writes the `videos` table; the schema
//! itself is owned elsewhere.

pub mod video;

pub use video::{PgVideoRepository, VideoRepository};
