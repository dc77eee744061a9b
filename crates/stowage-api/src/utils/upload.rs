//! Common utilities for file upload handlers

use std::io;

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use stowage_core::AppError;

const CANNOT_PARSE_FORM: &str = "cannot parse form";

/// Error returned when the request is not a usable multipart form.
pub fn cannot_parse_form() -> AppError {
    AppError::BadRequest(CANNOT_PARSE_FORM.to_string())
}

/// Multipart decoder error carried by an I/O error raised while streaming an upload.
/// `None` means the failure came from the filesystem.
pub fn multipart_error(err: &io::Error) -> Option<&MultipartError> {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<MultipartError>())
}

/// Whether the multipart stream failed because the request body hit its size ceiling.
pub fn exceeds_body_limit(err: &MultipartError) -> bool {
    err.status() == StatusCode::PAYLOAD_TOO_LARGE
}
