use tubely_core::AppError;

/// Failures of the external-tool stages.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("ffprobe failed: {0}")]
    Probe(String),

    #[error("ffmpeg remux failed: {0}")]
    Remux(String),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Probe(msg) => AppError::Probe(msg),
            ProcessingError::Remux(msg) => AppError::Remux(msg),
        }
    }
}
