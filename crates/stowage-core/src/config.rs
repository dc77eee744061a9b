//! Configuration module
//!
//! This module provides the server settings and the upload/storage configuration.
//! Everything is read once from the environment at startup, validated, and then
//! handed to the rest of the application as an explicit value.

use std::env;
use std::fmt::Display;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use validator::{Validate, ValidationError};

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_UPLOAD_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const THUMBNAIL_MAX_DIMENSION: u32 = 200;

/// Listener and deployment settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
}

/// Thumbnail settings, nested under the image category
#[derive(Clone, Debug, Validate)]
pub struct ThumbnailConfig {
    /// Directory relative to the image directory
    #[validate(
        length(min = 1, max = 64),
        custom(function = "validate_relative_dir")
    )]
    pub path: String,
    #[validate(range(min = 1))]
    pub max_width: u32,
    #[validate(range(min = 1))]
    pub max_height: u32,
}

/// Generic file category
#[derive(Clone, Debug, Validate)]
pub struct FileCategoryConfig {
    /// Directory relative to the upload root
    #[validate(
        length(min = 1, max = 64),
        custom(function = "validate_relative_dir")
    )]
    pub path: String,
    #[validate(range(min = 1))]
    pub max_size: u64,
    /// Permitted extensions with their leading dot, matched exactly. Empty allows all.
    #[validate(length(max = 100))]
    pub allowed_extensions: Vec<String>,
}

/// Image category
#[derive(Clone, Debug, Validate)]
pub struct ImageCategoryConfig {
    /// Directory relative to the upload root
    #[validate(
        length(min = 1, max = 64),
        custom(function = "validate_relative_dir")
    )]
    pub path: String,
    #[validate(range(min = 1))]
    pub max_size: u64,
    #[validate(nested)]
    pub thumbnail: ThumbnailConfig,
}

/// Upload and storage configuration
#[derive(Clone, Debug, Validate)]
pub struct UploadConfig {
    /// Root directory every category lives under
    #[validate(length(min = 1, max = 255))]
    pub path: String,
    /// Prefix prepended to every upload/download route, e.g. `/api`
    #[validate(length(max = 64), custom(function = "validate_url_prefix"))]
    pub url_prefix: String,
    #[validate(nested)]
    pub file: FileCategoryConfig,
    #[validate(nested)]
    pub image: ImageCategoryConfig,
}

impl UploadConfig {
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    /// Largest per-category ceiling, used to size the transport body limit.
    pub fn largest_max_size(&self) -> u64 {
        self.file.max_size.max(self.image.max_size)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = UploadConfig {
            path: env::var("UPLOAD_ROOT_PATH").unwrap_or_else(|_| "./uploads".to_string()),
            url_prefix: env::var("UPLOAD_URL_PREFIX").unwrap_or_default(),
            file: FileCategoryConfig {
                path: env::var("FILE_DIR").unwrap_or_else(|_| "file".to_string()),
                max_size: parse_env("FILE_MAX_SIZE_BYTES", MAX_UPLOAD_SIZE_BYTES)?,
                allowed_extensions: env::var("FILE_ALLOWED_EXTENSIONS")
                    .map(|s| parse_extension_list(&s))
                    .unwrap_or_default(),
            },
            image: ImageCategoryConfig {
                path: env::var("IMAGE_DIR").unwrap_or_else(|_| "image".to_string()),
                max_size: parse_env("IMAGE_MAX_SIZE_BYTES", MAX_UPLOAD_SIZE_BYTES)?,
                thumbnail: ThumbnailConfig {
                    path: env::var("THUMBNAIL_DIR").unwrap_or_else(|_| "thumbnail".to_string()),
                    max_width: parse_env("THUMBNAIL_MAX_WIDTH", THUMBNAIL_MAX_DIMENSION)?,
                    max_height: parse_env("THUMBNAIL_MAX_HEIGHT", THUMBNAIL_MAX_DIMENSION)?,
                },
            },
        };

        Ok(config)
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
}

impl Config {
    pub fn new(server: ServerConfig, upload: UploadConfig) -> Self {
        Self { server, upload }
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server = ServerConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
        };

        let config = Config::new(server, UploadConfig::from_env()?);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.upload
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid upload config: [{}]", e))?;

        if self.is_production() && self.server.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.server.server_port
    }

    pub fn environment(&self) -> &str {
        &self.server.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.server.cors_origins
    }

    pub fn url_prefix(&self) -> &str {
        &self.upload.url_prefix
    }
}

/// Read a numeric variable, falling back to `default` only when it is unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} must be a valid number: {}", key, e)),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated extension list. Case is preserved: generic file
/// extensions are matched exactly.
pub fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// A category directory must name at least one real segment below its parent;
/// `.` alone would alias the parent directory.
fn validate_relative_dir(path: &str) -> Result<(), ValidationError> {
    let components: Vec<Component> = Path::new(path).components().collect();
    let escapes_root = components
        .iter()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    let names_a_dir = components.iter().any(|c| matches!(c, Component::Normal(_)));

    if escapes_root || !names_a_dir {
        let mut err = ValidationError::new("relative_dir");
        err.message = Some(
            format!("'{}' must name a directory inside the upload root", path).into(),
        );
        return Err(err);
    }
    Ok(())
}

fn validate_url_prefix(prefix: &str) -> Result<(), ValidationError> {
    if prefix.is_empty() {
        return Ok(());
    }
    if !prefix.starts_with('/') || prefix.ends_with('/') || prefix.contains(char::is_whitespace) {
        let mut err = ValidationError::new("url_prefix");
        err.message =
            Some("must be empty or start with '/' and have no trailing '/'".into());
        return Err(err);
    }
    Ok(())
}
