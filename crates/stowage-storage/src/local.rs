use crate::layout::{validate_filename, Category, StorageLayout};
use crate::traits::{StagedFile, Storage, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncRead;
use uuid::Uuid;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    layout: StorageLayout,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating every category directory.
    pub async fn new(layout: StorageLayout) -> StorageResult<Self> {
        layout.ensure_dirs().await?;
        Ok(LocalStorage { layout })
    }

    /// Resolve a filename inside a category directory.
    ///
    /// The filename must be a single visible path segment, so the result can never
    /// escape the category directory.
    fn object_path(&self, category: Category, filename: &str) -> StorageResult<PathBuf> {
        validate_filename(filename)?;
        Ok(self.layout.dir(category).join(filename))
    }

    fn staging_path(&self, category: Category) -> PathBuf {
        self.layout
            .dir(category)
            .join(format!(".upload-{}.part", Uuid::new_v4()))
    }

    async fn remove_quietly(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove staging file"
                );
            }
        }
    }

    async fn write_staged(
        path: &Path,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> std::io::Result<u64> {
        let mut file = fs::File::create(path).await?;
        let size = tokio::io::copy(reader, &mut file).await?;
        file.sync_all().await?;
        Ok(size)
    }
}

/// Lookup failures that only mean "no such file".
fn is_absent(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
    )
}

#[async_trait]
impl Storage for LocalStorage {
    fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    async fn stage(
        &self,
        category: Category,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<StagedFile> {
        let temp_path = self.staging_path(category);
        let start = std::time::Instant::now();

        match Self::write_staged(&temp_path, reader).await {
            Ok(size) => {
                tracing::debug!(
                    path = %temp_path.display(),
                    category = %category,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Upload staged"
                );
                Ok(StagedFile {
                    category,
                    temp_path,
                    size,
                })
            }
            Err(e) => {
                Self::remove_quietly(&temp_path).await;
                Err(StorageError::IoError(e))
            }
        }
    }

    async fn commit(&self, staged: StagedFile, filename: &str) -> StorageResult<StoredObject> {
        let path = match self.object_path(staged.category, filename) {
            Ok(path) => path,
            Err(e) => {
                Self::remove_quietly(&staged.temp_path).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&staged.temp_path, &path).await {
            Self::remove_quietly(&staged.temp_path).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to move upload into {}: {}",
                path.display(),
                e
            )));
        }

        tracing::info!(
            path = %path.display(),
            category = %staged.category,
            filename = %filename,
            size_bytes = staged.size,
            "Local storage upload successful"
        );

        Ok(StoredObject {
            category: staged.category,
            filename: filename.to_string(),
            path,
            size: staged.size,
        })
    }

    async fn discard(&self, staged: StagedFile) {
        Self::remove_quietly(&staged.temp_path).await;
    }

    async fn locate(&self, category: Category, filename: &str) -> StorageResult<Option<PathBuf>> {
        let path = self.object_path(category, filename)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(path)),
            Ok(_) => Ok(None),
            Err(e) if is_absent(&e) => Ok(None),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }
}
