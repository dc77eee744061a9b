//! Upload service
//!
//! Streams the `file` field of a multipart request through the hasher into a staging
//! file, then commits it under its content hash. Images additionally get a
//! best-effort thumbnail.

use std::io;
use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use futures::TryStreamExt;
use stowage_core::constants::UPLOAD_FIELD;
use stowage_core::AppError;
use stowage_processing::{HashingReader, UploadValidator, ValidationError};
use stowage_storage::{Category, StorageError, StoredObject};
use tokio_util::io::StreamReader;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{cannot_parse_form, exceeds_body_limit, multipart_error};

use super::types::{IngestKind, UploadResponse};

pub struct UploadService {
    state: Arc<AppState>,
}

impl UploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Complete upload workflow: extract → validate → hash + stage → commit → thumbnail
    pub async fn ingest(
        &self,
        kind: IngestKind,
        mut multipart: Multipart,
    ) -> Result<UploadResponse, HttpAppError> {
        let validator = kind.validator(&self.state.config.upload);

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| Self::multipart_failure(&e, &validator))?
        {
            if field.name() != Some(UPLOAD_FIELD) {
                continue;
            }
            // A `file` part without a filename is a plain form value, not an upload.
            let Some(origin) = field.file_name().map(str::to_string) else {
                tracing::debug!("Skipping file field without a filename");
                continue;
            };
            let extension = validator.validate_extension(&origin)?;

            let stream = field.map_err(io::Error::other);
            let mut reader = HashingReader::new(
                StreamReader::new(Box::pin(stream)),
                validator.max_size(),
            );

            let staged = match self.state.storage.stage(kind.category(), &mut reader).await {
                Ok(staged) => staged,
                Err(e) => return Err(Self::stage_error(e, reader.limit_exceeded(), &validator)),
            };

            let (hash, size) = reader.finalize();
            if let Err(e) = validator.validate_file_size(size) {
                self.state.storage.discard(staged).await;
                return Err(e.into());
            }

            let filename = format!("{}{}", hash, extension);
            let stored = self
                .state
                .storage
                .commit(staged, &filename)
                .await
                .map_err(|e| match e {
                    StorageError::InvalidKey(_) => {
                        HttpAppError::from(ValidationError::UnsupportedType {
                            extension: extension.clone(),
                        })
                    }
                    other => other.into(),
                })?;

            tracing::info!(
                category = %stored.category,
                filename = %stored.filename,
                origin = %origin,
                size_bytes = size,
                "Upload stored"
            );

            if kind == IngestKind::Image {
                self.generate_thumbnail(&stored).await;
            }

            return Ok(UploadResponse {
                hash: hash.into_string(),
                filename,
                origin,
                size,
            });
        }

        Err(cannot_parse_form().into())
    }

    /// Map a failed stage to the client-facing error. The staging file has already
    /// been removed by the storage backend.
    fn stage_error(
        err: StorageError,
        limit_exceeded: bool,
        validator: &UploadValidator,
    ) -> HttpAppError {
        if limit_exceeded {
            return ValidationError::FileTooLarge {
                max: validator.max_size(),
            }
            .into();
        }

        if let StorageError::IoError(io_err) = &err {
            if let Some(multipart_err) = multipart_error(io_err) {
                return Self::multipart_failure(multipart_err, validator);
            }
        }
        err.into()
    }

    /// A body over the transport ceiling is reported like any other oversize upload;
    /// every other decoder failure means the form is unusable.
    fn multipart_failure(err: &MultipartError, validator: &UploadValidator) -> HttpAppError {
        if exceeds_body_limit(err) {
            tracing::debug!(error = %err, "Request body exceeded the upload ceiling");
            return ValidationError::FileTooLarge {
                max: validator.max_size(),
            }
            .into();
        }

        tracing::debug!(error = %err, "Failed to read multipart form");
        cannot_parse_form().into()
    }

    /// Failures are logged and otherwise ignored; the thumbnail route falls back to
    /// the original image.
    async fn generate_thumbnail(&self, stored: &StoredObject) {
        let generator = self.state.thumbnails;
        let original = stored.path.clone();
        let out_dir = self
            .state
            .storage
            .layout()
            .dir(Category::Thumbnail)
            .to_path_buf();

        let result =
            tokio::task::spawn_blocking(move || generator.generate(&original, &out_dir)).await;

        let error = match result {
            Ok(Ok(path)) => {
                tracing::debug!(thumbnail = %path.display(), "Thumbnail stored");
                return;
            }
            Ok(Err(e)) => AppError::ThumbnailGeneration(e.to_string()),
            Err(e) => AppError::ThumbnailGeneration(format!("thumbnail task failed: {}", e)),
        };

        tracing::warn!(
            error = %error,
            error_type = error.error_type(),
            filename = %stored.filename,
            "Thumbnail not generated, original will be served instead"
        );
    }
}
