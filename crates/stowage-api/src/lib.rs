//! Stowage API Library
//!
//! This crate provides the HTTP handlers, the upload pipeline and application setup.

mod api_doc;
mod handlers;
mod services;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::upload::{IngestKind, UploadResponse, UploadService};
pub use state::AppState;
