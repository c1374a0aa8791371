//! Geometry probing with ffprobe.

use crate::command::CommandRunner;
use crate::error::ProcessingError;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Width and height of the first video stream, both positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoGeometry {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<i64>,
    height: Option<i64>,
}

/// Reads frame dimensions of a local video file.
pub struct GeometryProber {
    runner: Arc<dyn CommandRunner>,
    ffprobe_path: String,
}

impl GeometryProber {
    pub fn new(runner: Arc<dyn CommandRunner>, ffprobe_path: impl Into<String>) -> Self {
        Self {
            runner,
            ffprobe_path: ffprobe_path.into(),
        }
    }

    pub fn probe_args(path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            "v:0".to_string(),
            "-show_entries".to_string(),
            "stream=width,height".to_string(),
            "-of".to_string(),
            "json".to_string(),
            path.to_string_lossy().to_string(),
        ]
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path
    ))]
    pub async fn probe(&self, path: &Path) -> Result<VideoGeometry, ProcessingError> {
        let start = std::time::Instant::now();

        let output = self
            .runner
            .run(&self.ffprobe_path, &Self::probe_args(path))
            .await
            .map_err(|e| ProcessingError::Probe(e.to_string()))?;

        if !output.success() {
            let stderr = output.stderr_lossy();
            return Err(ProcessingError::Probe(if stderr.is_empty() {
                format!("exited with status {:?}", output.status)
            } else {
                stderr
            }));
        }

        let geometry = parse_dimensions(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = geometry.width,
            height = geometry.height,
            "Video probe completed"
        );

        Ok(geometry)
    }
}

/// Extract the first stream's dimensions from ffprobe JSON output.
pub fn parse_dimensions(stdout: &[u8]) -> Result<VideoGeometry, ProcessingError> {
    let parsed: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::Probe(format!("Failed to parse ffprobe output: {}", e)))?;

    let stream = parsed
        .streams
        .first()
        .ok_or_else(|| ProcessingError::Probe("No video stream found".to_string()))?;

    let width = positive(stream.width, "width")?;
    let height = positive(stream.height, "height")?;

    Ok(VideoGeometry { width, height })
}

fn positive(value: Option<i64>, field: &str) -> Result<u32, ProcessingError> {
    match value {
        Some(v) if v > 0 => u32::try_from(v)
            .map_err(|_| ProcessingError::Probe(format!("Video {} out of range: {}", field, v))),
        Some(v) => Err(ProcessingError::Probe(format!(
            "Video {} must be positive, got {}",
            field, v
        ))),
        None => Err(ProcessingError::Probe(format!("Could not parse {}", field))),
    }
}
