use serde::{Deserialize, Serialize};
use stowage_core::UploadConfig;
use stowage_processing::UploadValidator;
use stowage_storage::Category;
use utoipa::ToSchema;

/// Which upload endpoint received the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestKind {
    Image,
    Generic,
}

impl IngestKind {
    pub fn category(&self) -> Category {
        match self {
            IngestKind::Image => Category::Image,
            IngestKind::Generic => Category::File,
        }
    }

    pub fn validator(&self, config: &UploadConfig) -> UploadValidator {
        match self {
            IngestKind::Image => UploadValidator::image(config.image.max_size),
            IngestKind::Generic => UploadValidator::generic(
                config.file.max_size,
                config.file.allowed_extensions.clone(),
            ),
        }
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Lowercase hex MD5 of the uploaded bytes
    #[schema(example = "a925576942e94b2ef57a066101b48876")]
    pub hash: String,
    /// Stored name, `<hash><extension>`
    #[schema(example = "a925576942e94b2ef57a066101b48876.jpeg")]
    pub filename: String,
    /// File name as sent by the client
    pub origin: String,
    /// Bytes received
    pub size: u64,
}
