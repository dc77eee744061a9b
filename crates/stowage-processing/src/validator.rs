use stowage_core::constants::IMAGE_EXTENSIONS;

/// Upload rejection reasons. The display strings are returned to clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unsupported file type {extension}")]
    UnsupportedType { extension: String },

    #[error("file too large, max is {max}")]
    FileTooLarge { max: u64 },
}

/// Suffix of `filename` from the last `.` of its final `/`-separated element, as
/// written. Empty when that element has no dot; a dotfile such as `.bashrc` is
/// all extension.
pub fn extension_of(filename: &str) -> String {
    match filename.rfind(['.', '/']) {
        Some(i) if filename[i..].starts_with('.') => filename[i..].to_string(),
        _ => String::new(),
    }
}

/// Extensions become part of the stored filename, so they must not carry path
/// separators or control characters.
fn is_storable(extension: &str) -> bool {
    !extension.chars().any(|c| c == '\\' || c.is_control())
}

/// Per-category upload rules
///
/// Images are matched case-insensitively against a fixed list and stored with a
/// lowercase extension. Generic files are matched exactly against an optional
/// allow-list and keep their extension as written.
#[derive(Debug, Clone)]
pub enum UploadValidator {
    Image {
        max_size: u64,
    },
    Generic {
        max_size: u64,
        allowed_extensions: Vec<String>,
    },
}

impl UploadValidator {
    pub fn image(max_size: u64) -> Self {
        UploadValidator::Image { max_size }
    }

    pub fn generic(max_size: u64, allowed_extensions: Vec<String>) -> Self {
        UploadValidator::Generic {
            max_size,
            allowed_extensions,
        }
    }

    pub fn max_size(&self) -> u64 {
        match self {
            UploadValidator::Image { max_size } => *max_size,
            UploadValidator::Generic { max_size, .. } => *max_size,
        }
    }

    /// Validate the extension of `filename`, returning the extension the stored
    /// artifact will carry.
    pub fn validate_extension(&self, filename: &str) -> Result<String, ValidationError> {
        let extension = extension_of(filename);

        match self {
            UploadValidator::Image { .. } => {
                let lowered = extension.to_lowercase();
                if IMAGE_EXTENSIONS.contains(&lowered.as_str()) {
                    Ok(lowered)
                } else {
                    Err(ValidationError::UnsupportedType {
                        extension: lowered,
                    })
                }
            }
            UploadValidator::Generic {
                allowed_extensions, ..
            } => {
                if !is_storable(&extension) {
                    return Err(ValidationError::UnsupportedType { extension });
                }
                if allowed_extensions.is_empty() || allowed_extensions.contains(&extension) {
                    Ok(extension)
                } else {
                    tracing::debug!(
                        extension = %extension,
                        allowed = ?allowed_extensions,
                        "Extension not in allow-list"
                    );
                    Err(ValidationError::UnsupportedType { extension })
                }
            }
        }
    }

    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        let max = self.max_size();
        if size > max {
            return Err(ValidationError::FileTooLarge { max });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), ".JPG");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(".bashrc"), ".bashrc");
        assert_eq!(extension_of("dir.v2/README"), "");
        assert_eq!(extension_of("trailing."), ".");
    }

    #[test]
    fn test_image_extension_is_case_insensitive() {
        let validator = UploadValidator::image(1024);
        assert_eq!(validator.validate_extension("cat.PNG").unwrap(), ".png");
        assert_eq!(validator.validate_extension("icon.ico").unwrap(), ".ico");
    }

    #[test]
    fn test_image_rejects_other_types() {
        let validator = UploadValidator::image(1024);
        let err = validator.validate_extension("bundle.zip").unwrap_err();
        assert_eq!(err.to_string(), "unsupported file type .zip");

        assert!(validator.validate_extension("noext").is_err());
    }

    #[test]
    fn test_generic_empty_allow_list_accepts_anything() {
        let validator = UploadValidator::generic(1024, vec![]);
        assert_eq!(validator.validate_extension("notes.TXT").unwrap(), ".TXT");
        assert_eq!(validator.validate_extension("Makefile").unwrap(), "");
    }

    #[test]
    fn test_generic_rejects_unstorable_extensions() {
        let validator = UploadValidator::generic(1024, vec![]);
        for name in ["notes.a\\b", "notes.a\tb", "notes.a\0b"] {
            assert!(
                matches!(
                    validator.validate_extension(name),
                    Err(ValidationError::UnsupportedType { .. })
                ),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_generic_allow_list_is_exact() {
        let validator = UploadValidator::generic(1024, vec![".zip".to_string()]);
        assert_eq!(validator.validate_extension("a.zip").unwrap(), ".zip");
        assert!(validator.validate_extension("a.ZIP").is_err());
        assert!(validator.validate_extension("a.rar").is_err());
    }

    #[test]
    fn test_file_size_ceiling() {
        let validator = UploadValidator::image(10);
        assert!(validator.validate_file_size(0).is_ok());
        assert!(validator.validate_file_size(10).is_ok());

        let err = validator.validate_file_size(11).unwrap_err();
        assert_eq!(err, ValidationError::FileTooLarge { max: 10 });
        assert_eq!(err.to_string(), "file too large, max is 10");
    }
}
