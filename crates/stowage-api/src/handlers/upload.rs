use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::{IngestKind, UploadResponse, UploadService};
use crate::state::AppState;
use crate::utils::upload::cannot_parse_form;

fn require_multipart(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Multipart, HttpAppError> {
    multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Request is not a multipart form");
        cannot_parse_form().into()
    })
}

/// Upload an image
///
/// Accepts `.jpg .jpeg .png .ico .svg .bmp .gif` (any case). The stored name uses
/// the lowercase extension. A thumbnail is generated for jpeg, png and gif.
#[utoipa::path(
    post,
    path = "/upload/image",
    tag = "upload",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form with a single `file` field"),
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Malformed form, unsupported type or file too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let multipart = require_multipart(multipart)?;
    let response = UploadService::new(&state)
        .ingest(IngestKind::Image, multipart)
        .await?;
    Ok(Json(response))
}

/// Upload a generic file
///
/// When an extension allow-list is configured the extension must match one entry
/// exactly. The stored name keeps the extension as sent.
#[utoipa::path(
    post,
    path = "/upload/file",
    tag = "upload",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form with a single `file` field"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Malformed form, unsupported type or file too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let multipart = require_multipart(multipart)?;
    let response = UploadService::new(&state)
        .ingest(IngestKind::Generic, multipart)
        .await?;
    Ok(Json(response))
}
