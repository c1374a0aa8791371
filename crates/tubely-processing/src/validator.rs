use tubely_core::AppError;

/// Common validation errors for uploaded media
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            ValidationError::InvalidContentType { .. } => {
                AppError::UnsupportedMediaType(err.to_string())
            }
        }
    }
}

/// Media file validator
///
/// Size and declared content type checks, run before anything touches disk.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .iter()
                .map(|ct| normalize_content_type(ct))
                .collect(),
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate file size. Exactly `max_file_size` is accepted.
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate content type, ignoring parameters and case.
    ///
    /// Returns the normalized media type on success.
    pub fn validate_content_type(&self, content_type: &str) -> Result<String, ValidationError> {
        let normalized = normalize_content_type(content_type);

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(normalized)
    }

    /// Size first, then content type.
    pub fn validate_all(&self, content_type: &str, size: usize) -> Result<String, ValidationError> {
        self.validate_file_size(size)?;
        self.validate_content_type(content_type)
    }
}

/// `"Video/MP4; codecs=avc1"` -> `"video/mp4"`
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// File extension used when storing media of a normalized content type.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "video/mp4" => Some("mp4"),
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        _ => None,
    }
}
