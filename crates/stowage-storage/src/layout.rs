//! Category to directory mapping.

use std::fmt;
use std::path::{Path, PathBuf};

use stowage_core::UploadConfig;
use tokio::fs;

use crate::traits::{StorageError, StorageResult};

/// Directory an artifact lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    File,
    Image,
    Thumbnail,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::File, Category::Image, Category::Thumbnail];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::File => "file",
            Category::Image => "image",
            Category::Thumbnail => "thumbnail",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute directories for every category
#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
    file_dir: PathBuf,
    image_dir: PathBuf,
    thumbnail_dir: PathBuf,
}

impl StorageLayout {
    pub fn from_config(config: &UploadConfig) -> Self {
        let root = config.root_path();
        let file_dir = root.join(&config.file.path);
        let image_dir = root.join(&config.image.path);
        let thumbnail_dir = image_dir.join(&config.image.thumbnail.path);

        Self {
            root,
            file_dir,
            image_dir,
            thumbnail_dir,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, category: Category) -> &Path {
        match category {
            Category::File => &self.file_dir,
            Category::Image => &self.image_dir,
            Category::Thumbnail => &self.thumbnail_dir,
        }
    }

    /// Every directory the service needs, root first.
    pub fn directories(&self) -> [(&'static str, &Path); 4] {
        [
            ("root", self.root.as_path()),
            ("file", self.file_dir.as_path()),
            ("image", self.image_dir.as_path()),
            ("thumbnail", self.thumbnail_dir.as_path()),
        ]
    }

    /// Create all directories. Any failure is a configuration error: the service
    /// must not accept uploads without its layout in place.
    pub async fn ensure_dirs(&self) -> StorageResult<()> {
        for (name, dir) in self.directories() {
            fs::create_dir_all(dir).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create {} directory {}: {}",
                    name,
                    dir.display(),
                    e
                ))
            })?;
        }

        tracing::info!(
            root = %self.root.display(),
            file_dir = %self.file_dir.display(),
            image_dir = %self.image_dir.display(),
            thumbnail_dir = %self.thumbnail_dir.display(),
            "Storage layout ready"
        );
        Ok(())
    }
}

/// Longest file name most filesystems accept, in bytes.
pub const MAX_FILENAME_BYTES: usize = 255;

/// Reject anything that is not a single, visible path segment.
pub fn validate_filename(filename: &str) -> StorageResult<()> {
    let invalid = filename.is_empty()
        || filename.len() > MAX_FILENAME_BYTES
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0')
        || filename.contains("..")
        || filename.starts_with('.');

    if invalid {
        return Err(StorageError::InvalidKey(filename.to_string()));
    }
    Ok(())
}
