//! Storage setup and initialization

use anyhow::{Context, Result};
use stowage_core::Config;
use stowage_storage::{LocalStorage, Storage, StorageLayout};
use std::sync::Arc;

/// Create the directory layout and the storage backend.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(root = %config.upload.path, "Initializing local storage...");

    let layout = StorageLayout::from_config(&config.upload);
    let storage = LocalStorage::new(layout)
        .await
        .context("Failed to prepare upload directories")?;

    Ok(Arc::new(storage))
}
