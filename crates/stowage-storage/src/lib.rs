//! Stowage Storage Library
//!
//! This crate maps upload categories to directories under the configured root and
//! provides the filesystem-backed `Storage` implementation.
//!
//! # Layout
//!
//! - `<root>/<file dir>/<hash><ext>`
//! - `<root>/<image dir>/<hash><ext>`
//! - `<root>/<image dir>/<thumbnail dir>/<hash><ext>`
//!
//! Filenames must be a single path segment: no separators, no `..`, no leading dot.
//! Writes are staged to a hidden file in the destination directory and renamed into
//! place, so readers never observe a partially written artifact.

pub mod layout;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use layout::{validate_filename, Category, StorageLayout};
pub use local::LocalStorage;
pub use traits::{StagedFile, Storage, StorageError, StorageResult, StoredObject};
