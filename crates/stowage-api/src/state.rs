//! Application state shared by every handler.

use std::sync::Arc;

use stowage_core::Config;
use stowage_processing::ThumbnailGenerator;
use stowage_storage::Storage;

/// Immutable after startup; handlers receive it as `State<Arc<AppState>>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Arc<dyn Storage>,
    pub thumbnails: ThumbnailGenerator,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let thumbnail = &config.upload.image.thumbnail;
        let thumbnails = ThumbnailGenerator::new(thumbnail.max_width, thumbnail.max_height);
        Self {
            config: Arc::new(config),
            storage,
            thumbnails,
        }
    }
}
