//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - every storage directory exists.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut directories = serde_json::Map::new();
    let mut overall_ready = true;

    for (name, dir) in state.storage.layout().directories() {
        let status = match tokio::fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => "ready".to_string(),
            Ok(_) => {
                overall_ready = false;
                "not_a_directory".to_string()
            }
            Err(e) => {
                tracing::error!(error = %e, directory = %dir.display(), "Storage directory unavailable");
                overall_ready = false;
                format!("not_ready: {}", e.kind())
            }
        };
        directories.insert(name.to_string(), serde_json::Value::String(status));
    }

    let (status_code, status) = if overall_ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": status,
            "storage": directories,
        })),
    )
}
