//! Route configuration and setup

mod health;

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use stowage_core::constants::MULTIPART_OVERHEAD_BYTES;
use stowage_core::Config;
use stowage_infra::{download_security_headers_middleware, get_request_id, request_id_middleware};
use tracing::Span;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
///
/// Upload and download routes live under the configured URL prefix; probes and the
/// OpenAPI document do not.
pub fn setup_routes(state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let config = state.config.clone();
    let prefix = config.url_prefix();
    let cors = setup_cors(&config)?;

    let app = Router::new()
        .merge(upload_routes(prefix, &config))
        .merge(download_routes(prefix))
        .merge(public_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    tracing::info!(
        url_prefix = %prefix,
        body_limit_bytes = body_limit(&config),
        "Routes configured"
    );

    Ok(app)
}

/// Request span carrying the id assigned by the request id middleware, which runs
/// outside the trace layer.
fn make_request_span(request: &Request) -> Span {
    let request_id = get_request_id(request).unwrap_or_default();
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Transport ceiling: the largest category max plus room for multipart framing.
/// Per-category limits are enforced while streaming. Bodies over the ceiling fail
/// inside the multipart stream, where the upload service reports them as too large.
fn body_limit(config: &Config) -> usize {
    usize::try_from(config.upload.largest_max_size())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

fn upload_routes(prefix: &str, config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/upload/image", prefix),
            post(handlers::upload::upload_image),
        )
        .route(
            &format!("{}/upload/file", prefix),
            post(handlers::upload::upload_file),
        )
        .layer(DefaultBodyLimit::max(body_limit(config)))
        .route(
            &format!("{}/upload/example", prefix),
            get(handlers::example::upload_example),
        )
}

fn download_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/download/image/origin/{{filename}}", prefix),
            get(handlers::download::get_origin_image),
        )
        .route(
            &format!("{}/download/image/thumbnail/{{filename}}", prefix),
            get(handlers::download::get_thumbnail),
        )
        .route(
            &format!("{}/download/file/raw/{{filename}}", prefix),
            get(handlers::download::get_file_raw),
        )
        .route(
            &format!("{}/download/file/download/{{filename}}", prefix),
            get(handlers::download::download_file),
        )
        .layer(axum::middleware::from_fn(
            download_security_headers_middleware,
        ))
}

/// Probes and the API document
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/openapi.json",
            get(|State(state): State<Arc<AppState>>| async move {
                Json(crate::api_doc::get_openapi_spec(state.config.url_prefix()))
            }),
        )
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
