//! Stowage Processing Library
//!
//! This crate provides the CPU-side parts of the upload pipeline:
//! - Content hashing, streamed alongside the write to disk (hasher)
//! - Extension and size rules for each upload category (validator)
//! - Thumbnail generation for raster images (image)

pub mod hasher;
#[cfg(feature = "image")]
pub mod image;
pub mod validator;

pub use hasher::{hash_bytes, hash_file, ContentHash, ContentHasher, HashingReader};
#[cfg(feature = "image")]
pub use self::image::{fit_within, ThumbnailError, ThumbnailGenerator};
pub use validator::{extension_of, UploadValidator, ValidationError};
