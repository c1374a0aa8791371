//! Types shared by the ingestion services

use bytes::Bytes;

/// A file received from a multipart field, not yet validated.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Bytes,
    /// Declared content type, as sent by the client.
    pub content_type: String,
    pub file_name: Option<String>,
}

impl UploadedFile {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
            file_name: None,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
