//! Retrieval of stored artifacts
//!
//! Filenames come straight from the URL; anything that is not a single visible path
//! segment is answered with 404 before touching the filesystem.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, HeaderValue},
    response::Response,
};
use stowage_core::AppError;
use stowage_storage::{Category, StorageError};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

fn not_found() -> HttpAppError {
    AppError::NotFound("file not found".to_string()).into()
}

async fn locate(
    state: &AppState,
    category: Category,
    filename: &str,
) -> Result<Option<PathBuf>, HttpAppError> {
    match state.storage.locate(category, filename).await {
        Ok(path) => Ok(path),
        Err(StorageError::IoError(e)) => Err(AppError::Internal(format!(
            "Failed to read stored {} {}: {}",
            category, filename, e
        ))
        .into()),
        Err(e) => Err(e.into()),
    }
}

/// Stream a file with a content type guessed from its extension, range support
/// and `Content-Length`.
async fn serve_path(path: PathBuf, request: Request) -> Response {
    let response = ServeFile::new(path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});
    response.map(Body::new)
}

fn content_disposition(filename: &str) -> Option<HeaderValue> {
    let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", escaped)).ok()
}

#[utoipa::path(
    get,
    path = "/download/image/origin/{filename}",
    tag = "download",
    params(("filename" = String, Path, description = "Stored image name, `<hash><ext>`")),
    responses(
        (status = 200, description = "Original image", content_type = "application/octet-stream"),
        (status = 404, description = "No such image", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn get_origin_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, HttpAppError> {
    let path = locate(&state, Category::Image, &filename)
        .await?
        .ok_or_else(not_found)?;
    Ok(serve_path(path, request).await)
}

/// Serve the thumbnail, or the original image when no thumbnail was generated.
#[utoipa::path(
    get,
    path = "/download/image/thumbnail/{filename}",
    tag = "download",
    params(("filename" = String, Path, description = "Stored image name, `<hash><ext>`")),
    responses(
        (status = 200, description = "Thumbnail, or the original when none exists", content_type = "application/octet-stream"),
        (status = 404, description = "No such image", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, HttpAppError> {
    let path = match locate(&state, Category::Thumbnail, &filename).await? {
        Some(path) => path,
        None => {
            tracing::debug!(filename = %filename, "No thumbnail, falling back to original");
            locate(&state, Category::Image, &filename)
                .await?
                .ok_or_else(not_found)?
        }
    };
    Ok(serve_path(path, request).await)
}

#[utoipa::path(
    get,
    path = "/download/file/raw/{filename}",
    tag = "download",
    params(("filename" = String, Path, description = "Stored file name, `<hash><ext>`")),
    responses(
        (status = 200, description = "File content, inline", content_type = "application/octet-stream"),
        (status = 404, description = "No such file", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn get_file_raw(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, HttpAppError> {
    let path = locate(&state, Category::File, &filename)
        .await?
        .ok_or_else(not_found)?;
    Ok(serve_path(path, request).await)
}

/// Same content as the raw route, marked as an attachment.
#[utoipa::path(
    get,
    path = "/download/file/download/{filename}",
    tag = "download",
    params(("filename" = String, Path, description = "Stored file name, `<hash><ext>`")),
    responses(
        (status = 200, description = "File content as attachment", content_type = "application/octet-stream"),
        (status = 404, description = "No such file", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, HttpAppError> {
    let path = locate(&state, Category::File, &filename)
        .await?
        .ok_or_else(not_found)?;

    let mut response = serve_path(path, request).await;
    if response.status().is_success() {
        if let Some(value) = content_disposition(&filename) {
            response
                .headers_mut()
                .insert(header::CONTENT_DISPOSITION, value);
        }
    }
    Ok(response)
}
