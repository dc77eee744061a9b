//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use stowage_core::Config;
use std::sync::Arc;

/// Initialize the entire application
///
/// Tracing must already be initialized; tests call this directly.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    // Every category directory must exist before the first upload
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(config, storage));
    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
