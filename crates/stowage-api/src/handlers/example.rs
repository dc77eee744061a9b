use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::state::AppState;

const EXAMPLE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Upload example</title>
</head>
<body>
  <h2>Upload image</h2>
  <form action="{prefix}/upload/image" method="post" enctype="multipart/form-data">
    <input type="file" name="file" accept="image/*">
    <input type="submit" value="Upload image">
  </form>
  <h2>Upload file</h2>
  <form action="{prefix}/upload/file" method="post" enctype="multipart/form-data">
    <input type="file" name="file">
    <input type="submit" value="Upload file">
  </form>
</body>
</html>
"#;

fn render_example_page(prefix: &str) -> String {
    EXAMPLE_PAGE.replace("{prefix}", prefix)
}

/// HTML page with one form per upload endpoint
#[utoipa::path(
    get,
    path = "/upload/example",
    tag = "upload",
    responses((status = 200, description = "Upload form", content_type = "text/html"))
)]
pub async fn upload_example(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_example_page(state.config.url_prefix()))
}
