//! HTTP error response body
//!
//! The `IntoResponse` conversion for `AppError` lives in the API crate: neither the
//! trait nor the error type is local to this crate.

use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response format for HTTP APIs
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message, e.g. `unsupported file type .zip`
    pub message: String,
    /// Machine-readable code, e.g. `BAD_REQUEST`
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
