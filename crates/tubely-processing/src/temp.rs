//! Scoped ownership of temporary files created during one ingestion.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Tracks local files owned by a single ingestion and deletes them.
///
/// Register a path before the file is created so that a failure half-way
/// through writing it still gets cleaned up. Call [`TempArtifacts::cleanup`]
/// on every exit path; if the owning future is dropped first (client
/// disconnect), `Drop` removes whatever is still registered.
#[derive(Debug, Default)]
pub struct TempArtifacts {
    paths: Vec<PathBuf>,
}

impl TempArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Delete every registered file. Idempotent; failures are logged only.
    pub async fn cleanup(&mut self) {
        for path in self.paths.drain(..) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "Removed temporary file"),
                Err(e) => log_remove_error(&path, &e),
            }
        }
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            if let Err(e) = std::fs::remove_file(&path) {
                log_remove_error(&path, &e);
            }
        }
    }
}

fn log_remove_error(path: &Path, err: &std::io::Error) {
    if err.kind() != ErrorKind::NotFound {
        tracing::warn!(
            error = %err,
            path = %path.display(),
            "Failed to remove temporary file"
        );
    }
}
