//! Tubely Processing Library
//!
//! Media validation and the external-tool stages of video ingestion: geometry
//! probing with `ffprobe`, aspect classification, and faststart remuxing with
//! `ffmpeg`. Tools are reached through the [`CommandRunner`] capability so the
//! stages can be driven by a scripted runner in tests.

pub mod command;
pub mod error;
pub mod temp;
pub mod validator;
pub mod video;

pub use command::{CommandError, CommandOutput, CommandRunner, TokioCommandRunner};
pub use error::ProcessingError;
pub use temp::TempArtifacts;
pub use validator::{
    extension_for_content_type, normalize_content_type, MediaValidator, ValidationError,
};
pub use video::{classify, FaststartRemuxer, GeometryProber, VideoGeometry, ASPECT_TOLERANCE};
