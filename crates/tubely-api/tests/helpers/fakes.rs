//! In-process stand-ins for Postgres and the ffmpeg tools.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tubely_core::{models::Video, AppError};
use tubely_db::VideoRepository;
use tubely_processing::faststart::processing_output_path;
use tubely_processing::{Dimensions, MediaError, MediaToolkit};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryVideoRepository {
    rows: Mutex<HashMap<Uuid, Video>>,
    fail_updates: AtomicBool,
    updates: AtomicUsize,
}

impl InMemoryVideoRepository {
    pub fn insert(&self, video: Video) {
        self.rows.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.get(id))
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("record store unavailable".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&video.id) {
            Some(row) => {
                *row = video.clone();
                self.updates.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            None => Err(AppError::NotFound("Couldn't find video".to_string())),
        }
    }
}

/// Reports fixed dimensions and remuxes by copying the input.
pub struct FakeToolkit {
    dimensions: Mutex<Dimensions>,
    fail_remux: AtomicBool,
    probes: AtomicUsize,
    remuxes: AtomicUsize,
}

impl FakeToolkit {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: Mutex::new(Dimensions { width, height }),
            fail_remux: AtomicBool::new(false),
            probes: AtomicUsize::new(0),
            remuxes: AtomicUsize::new(0),
        }
    }

    pub fn set_dimensions(&self, width: u32, height: u32) {
        *self.dimensions.lock().unwrap() = Dimensions { width, height };
    }

    pub fn fail_remux(&self) {
        self.fail_remux.store(true, Ordering::SeqCst);
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn remux_count(&self) -> usize {
        self.remuxes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaToolkit for FakeToolkit {
    async fn probe(&self, _path: &Path) -> Result<Dimensions, MediaError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        Ok(*self.dimensions.lock().unwrap())
    }

    async fn remux_for_fast_start(&self, path: &Path) -> Result<PathBuf, MediaError> {
        self.remuxes.fetch_add(1, Ordering::SeqCst);
        let output = processing_output_path(path);
        if self.fail_remux.load(Ordering::SeqCst) {
            // Leave a partial file behind like a crashed ffmpeg would
            tokio::fs::write(&output, b"partial").await.map_err(|e| MediaError::Spawn {
                tool: "ffmpeg".to_string(),
                source: e,
            })?;
            return Err(MediaError::ToolFailed {
                tool: "ffmpeg".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "moov atom not found".to_string(),
            });
        }
        tokio::fs::copy(path, &output)
            .await
            .map_err(|e| MediaError::Spawn {
                tool: "ffmpeg".to_string(),
                source: e,
            })?;
        Ok(output)
    }
}
