//! Storage abstraction trait
//!
//! This module defines the Storage trait used by the upload pipeline and the
//! retrieval handlers.

use crate::layout::{Category, StorageLayout};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid filename: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Content written to a hidden staging file, not yet visible under its final name.
#[derive(Debug)]
pub struct StagedFile {
    pub category: Category,
    pub temp_path: PathBuf,
    pub size: u64,
}

/// An artifact committed under its content-derived filename.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub category: Category,
    pub filename: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Storage abstraction trait
///
/// Uploads go through `stage` then either `commit` or `discard`. The split exists
/// because the final filename (the content hash) is only known once the whole
/// stream has been consumed.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Resolved directory layout
    fn layout(&self) -> &StorageLayout;

    /// Drain `reader` into a staging file inside the category directory.
    ///
    /// On failure the staging file is removed before the error is returned.
    async fn stage(
        &self,
        category: Category,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<StagedFile>;

    /// Atomically move a staged file to `<category dir>/<filename>`, replacing any
    /// existing file with that name.
    async fn commit(&self, staged: StagedFile, filename: &str) -> StorageResult<StoredObject>;

    /// Remove a staged file that will not be committed.
    async fn discard(&self, staged: StagedFile);

    /// Path of an existing artifact, `None` if absent or not addressable as a file.
    async fn locate(&self, category: Category, filename: &str) -> StorageResult<Option<PathBuf>>;
}
