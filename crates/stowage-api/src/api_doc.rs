//! OpenAPI documentation.
//! Handler annotations use unprefixed paths; the configured URL prefix is applied
//! when the document is served.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::services::upload::UploadResponse;

/// Prepend the URL prefix to every upload/download path. Probes and the document
/// itself are not prefixed.
fn apply_url_prefix(spec: &mut utoipa::openapi::OpenApi, prefix: &str) {
    if prefix.is_empty() {
        return;
    }
    let path_map = std::mem::take(&mut spec.paths.paths);
    for (key, item) in path_map {
        spec.paths.paths.insert(format!("{}{}", prefix, key), item);
    }
}

/// Returns the OpenAPI document with paths under `prefix`.
pub fn get_openapi_spec(prefix: &str) -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    apply_url_prefix(&mut spec, prefix);
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stowage API",
        version = "0.1.0",
        description = "Content-addressed upload service. Uploaded files are stored under the MD5 of their bytes; images get a thumbnail."
    ),
    paths(
        handlers::upload::upload_image,
        handlers::upload::upload_file,
        handlers::example::upload_example,
        handlers::download::get_origin_image,
        handlers::download::get_thumbnail,
        handlers::download::get_file_raw,
        handlers::download::download_file,
    ),
    components(schemas(UploadResponse, ErrorResponse)),
    tags(
        (name = "upload", description = "Image and file uploads"),
        (name = "download", description = "Retrieval of stored files")
    )
)]
pub struct ApiDoc;
