//! Faststart remuxing with ffmpeg.
//!
//! Moves the MP4 `moov` atom to the front of the file so playback can begin
//! before the whole object has downloaded. Streams are copied, not re-encoded.

use crate::command::CommandRunner;
use crate::error::ProcessingError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Suffix appended to the input path to name the remuxed output.
pub const PROCESSED_SUFFIX: &str = ".processed";

pub struct FaststartRemuxer {
    runner: Arc<dyn CommandRunner>,
    ffmpeg_path: String,
}

impl FaststartRemuxer {
    pub fn new(runner: Arc<dyn CommandRunner>, ffmpeg_path: impl Into<String>) -> Self {
        Self {
            runner,
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// Where [`FaststartRemuxer::remux`] writes its output for `input`.
    pub fn output_path_for(input: &Path) -> PathBuf {
        let mut name: OsString = input.as_os_str().to_owned();
        name.push(PROCESSED_SUFFIX);
        PathBuf::from(name)
    }

    pub fn remux_args(input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-movflags".to_string(),
            "faststart".to_string(),
            "-map_metadata".to_string(),
            "0".to_string(),
            "-codec".to_string(),
            "copy".to_string(),
            "-f".to_string(),
            "mp4".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Remux `input` and return the output path.
    ///
    /// On failure a partial output may remain at [`FaststartRemuxer::output_path_for`];
    /// removing it is the caller's job.
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    pub async fn remux(&self, input: &Path) -> Result<PathBuf, ProcessingError> {
        let start = std::time::Instant::now();
        let output_path = Self::output_path_for(input);

        let output = self
            .runner
            .run(&self.ffmpeg_path, &Self::remux_args(input, &output_path))
            .await
            .map_err(|e| ProcessingError::Remux(e.to_string()))?;

        if !output.success() {
            let stderr = output.stderr_lossy();
            return Err(ProcessingError::Remux(if stderr.is_empty() {
                format!("exited with status {:?}", output.status)
            } else {
                stderr
            }));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output = %output_path.display(),
            "Faststart remux completed"
        );

        Ok(output_path)
    }
}
