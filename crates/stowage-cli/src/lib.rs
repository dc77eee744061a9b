//! Offline inspection of an upload root: per-category totals and hash verification.

use std::path::{Path, PathBuf};

use serde::Serialize;
use stowage_processing::{extension_of, hash_file};
use stowage_storage::{Category, StorageLayout};
use tokio::fs;

/// Totals for one category directory
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: String,
    pub directory: String,
    pub files: u64,
    pub total_bytes: u64,
}

/// A stored file whose name is not `<md5 of content><extension>`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Mismatch {
    pub category: String,
    pub filename: String,
    pub actual_hash: String,
}

#[derive(Debug, Default, Serialize)]
pub struct VerifyReport {
    pub checked: u64,
    pub mismatches: Vec<Mismatch>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Visible regular files directly inside `dir`, sorted by name. Staging files and
/// nested directories (the thumbnail directory lives inside the image directory)
/// are skipped.
async fn stored_files(dir: &Path) -> anyhow::Result<Vec<(String, PathBuf, u64)>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let meta = entry.metadata().await?;
        if meta.is_file() {
            files.push((name, entry.path(), meta.len()));
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

pub async fn collect_stats(layout: &StorageLayout) -> anyhow::Result<Vec<CategoryStats>> {
    let mut stats = Vec::with_capacity(Category::ALL.len());

    for category in Category::ALL {
        let dir = layout.dir(category);
        let files = stored_files(dir).await?;
        stats.push(CategoryStats {
            category: category.to_string(),
            directory: dir.display().to_string(),
            files: files.len() as u64,
            total_bytes: files.iter().map(|(_, _, size)| size).sum(),
        });
    }

    Ok(stats)
}

/// Recompute the hash of every original in `categories`.
pub async fn verify(
    layout: &StorageLayout,
    categories: &[Category],
) -> anyhow::Result<VerifyReport> {
    let mut report = VerifyReport::default();

    for &category in categories {
        for (name, path, _) in stored_files(layout.dir(category)).await? {
            let (hash, _) = hash_file(&path).await?;
            report.checked += 1;

            let expected = format!("{}{}", hash, extension_of(&name));
            if name != expected {
                tracing::warn!(
                    category = %category,
                    filename = %name,
                    actual_hash = %hash,
                    "Stored file does not match its content hash"
                );
                report.mismatches.push(Mismatch {
                    category: category.to_string(),
                    filename: name,
                    actual_hash: hash.into_string(),
                });
            }
        }
    }

    Ok(report)
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
