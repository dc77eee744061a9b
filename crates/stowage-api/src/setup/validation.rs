//! Configuration validation
//!
//! Validates the loaded configuration at startup to catch misconfigurations early.

use anyhow::Result;
use stowage_core::Config;
use stowage_storage::{Category, StorageLayout};

/// Validate critical configuration values
///
/// Re-runs the field rules (configs built in code skip `Config::from_env`) and
/// checks the resulting layout for overlapping category directories.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let upload = &config.upload;
    validate_layout(&StorageLayout::from_config(upload))?;

    if !config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
    }

    tracing::debug!(
        root = %upload.path,
        url_prefix = %upload.url_prefix,
        file_dir = %upload.file.path,
        image_dir = %upload.image.path,
        thumbnail_dir = %upload.image.thumbnail.path,
        "Upload layout validated"
    );

    Ok(())
}

/// Category directories are compared after resolution, so `./image` and `image`
/// count as the same place.
///
/// Files must not share or nest with the image tree, and thumbnails must sit strictly
/// below originals; otherwise one category would overwrite another's artifacts.
fn validate_layout(layout: &StorageLayout) -> Result<()> {
    let root = layout.root();
    let file_dir = layout.dir(Category::File);
    let image_dir = layout.dir(Category::Image);
    let thumbnail_dir = layout.dir(Category::Thumbnail);

    for (name, dir) in [
        ("FILE_DIR", file_dir),
        ("IMAGE_DIR", image_dir),
        ("THUMBNAIL_DIR", thumbnail_dir),
    ] {
        if dir == root {
            return Err(anyhow::anyhow!(
                "{} resolves to the upload root {}",
                name,
                root.display()
            ));
        }
    }

    if file_dir.starts_with(image_dir) || image_dir.starts_with(file_dir) {
        return Err(anyhow::anyhow!(
            "FILE_DIR ({}) and IMAGE_DIR ({}) must not be the same or nested",
            file_dir.display(),
            image_dir.display()
        ));
    }

    if thumbnail_dir == image_dir {
        return Err(anyhow::anyhow!(
            "THUMBNAIL_DIR resolves to IMAGE_DIR ({})",
            image_dir.display()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_core::{
        FileCategoryConfig, ImageCategoryConfig, ServerConfig, ThumbnailConfig, UploadConfig,
    };

    fn config(file_dir: &str, image_dir: &str) -> Config {
        Config::new(
            ServerConfig {
                server_port: 4000,
                environment: "development".to_string(),
                cors_origins: vec!["*".to_string()],
            },
            UploadConfig {
                path: "/tmp/stowage".to_string(),
                url_prefix: String::new(),
                file: FileCategoryConfig {
                    path: file_dir.to_string(),
                    max_size: 1024,
                    allowed_extensions: vec![],
                },
                image: ImageCategoryConfig {
                    path: image_dir.to_string(),
                    max_size: 1024,
                    thumbnail: ThumbnailConfig {
                        path: "thumbnail".to_string(),
                        max_width: 200,
                        max_height: 200,
                    },
                },
            },
        )
    }

    #[test]
    fn test_distinct_dirs_pass() {
        assert!(validate_config(&config("file", "image")).is_ok());
    }

    fn config_with_thumbnail(file_dir: &str, image_dir: &str, thumbnail_dir: &str) -> Config {
        let mut config = config(file_dir, image_dir);
        config.upload.image.thumbnail.path = thumbnail_dir.to_string();
        config
    }

    #[test]
    fn test_shared_dir_rejected() {
        assert!(validate_config(&config("shared", "shared")).is_err());
    }

    #[test]
    fn test_equivalent_spellings_of_one_dir_rejected() {
        assert!(validate_config(&config("./image", "image")).is_err());
        assert!(validate_config(&config("image/.", "image")).is_err());
    }

    #[test]
    fn test_nested_category_dirs_rejected() {
        assert!(validate_config(&config("image/thumbnail", "image")).is_err());
        assert!(validate_config(&config("image/docs", "image")).is_err());
        assert!(validate_config(&config("media", "media/images")).is_err());
    }

    #[test]
    fn test_thumbnail_dir_cannot_alias_image_dir() {
        assert!(validate_config(&config_with_thumbnail("file", "image", ".")).is_err());
        assert!(validate_config(&config_with_thumbnail("file", "image", "./thumbs")).is_ok());
    }

    #[test]
    fn test_layout_check_runs_on_resolved_paths() {
        let config = config("./file", "image");
        let layout = StorageLayout::from_config(&config.upload);
        assert!(validate_layout(&layout).is_ok());
        assert_eq!(layout.dir(Category::File), layout.root().join("file"));
    }
}
