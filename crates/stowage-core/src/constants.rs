//! Constants shared by the upload pipeline and the HTTP layer.

/// Multipart field that carries the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Extensions accepted by the image upload endpoint (lowercase, with leading dot).
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".ico", ".svg", ".bmp", ".gif"];

/// Extra room granted to the request body limit on top of the largest category
/// ceiling, to fit multipart boundaries and part headers.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
