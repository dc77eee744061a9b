//! Image processing module
//!
//! Only thumbnail derivation lives here; originals are stored byte-for-byte.

pub mod thumbnail;

pub use thumbnail::{fit_within, ThumbnailError, ThumbnailGenerator};
