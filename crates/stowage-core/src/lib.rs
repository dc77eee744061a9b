//! Stowage Core Library
//!
//! This crate provides the configuration model, validation rules, and error types
//! shared by every Stowage component.

pub mod config;
pub mod constants;
pub mod error;

// Re-export commonly used types
pub use config::{
    Config, FileCategoryConfig, ImageCategoryConfig, ServerConfig, ThumbnailConfig, UploadConfig,
};
pub use error::{AppError, ErrorMetadata, LogLevel};
