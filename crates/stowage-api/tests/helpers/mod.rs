//! Test helpers: build the router over a temporary upload root.
//!
//! Run from workspace root: `cargo test -p stowage-api`.

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use std::path::{Path, PathBuf};
use stowage_core::{
    Config, FileCategoryConfig, ImageCategoryConfig, ServerConfig, ThumbnailConfig, UploadConfig,
};
use tempfile::TempDir;

/// Test application: server plus the temporary root it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub config: Config,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Route path under the configured URL prefix
    pub fn path(&self, path: &str) -> String {
        format!("{}{}", self.config.url_prefix(), path)
    }

    pub fn root(&self) -> PathBuf {
        self.config.upload.root_path()
    }

    pub fn file_dir(&self) -> PathBuf {
        self.root().join(&self.config.upload.file.path)
    }

    pub fn image_dir(&self) -> PathBuf {
        self.root().join(&self.config.upload.image.path)
    }

    pub fn thumbnail_dir(&self) -> PathBuf {
        self.image_dir().join(&self.config.upload.image.thumbnail.path)
    }
}

pub fn create_test_config(root: &Path) -> Config {
    Config::new(
        ServerConfig {
            server_port: 0,
            environment: "test".to_string(),
            cors_origins: vec!["*".to_string()],
        },
        UploadConfig {
            path: root.join("uploads").to_string_lossy().to_string(),
            url_prefix: String::new(),
            file: FileCategoryConfig {
                path: "file".to_string(),
                max_size: 1024 * 1024,
                allowed_extensions: vec![],
            },
            image: ImageCategoryConfig {
                path: "image".to_string(),
                max_size: 1024 * 1024,
                thumbnail: ThumbnailConfig {
                    path: "thumbnail".to_string(),
                    max_width: 200,
                    max_height: 200,
                },
            },
        },
    )
}

/// Setup test app with default limits.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup test app after adjusting the default test configuration.
pub async fn setup_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let mut config = create_test_config(temp_dir.path());
    customize(&mut config);

    let (_state, router) = stowage_api::setup::initialize_app(config.clone())
        .await
        .expect("Failed to initialize app");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        config,
        _temp_dir: temp_dir,
    }
}

/// Multipart form with a single `file` field.
pub fn file_form(filename: &str, data: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data.to_vec())
            .file_name(filename)
            .mime_type("application/octet-stream"),
    )
}

/// Names of the regular files directly inside `dir`, sorted. Hidden staging files
/// are included so tests can assert nothing was left behind.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
