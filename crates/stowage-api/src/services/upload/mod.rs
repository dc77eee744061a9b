//! Upload pipeline: extract → validate → hash while staging → commit → thumbnail

mod service;
mod types;

pub use service::UploadService;
pub use types::{IngestKind, UploadResponse};
