//! Database repositories for data access layer
//!
//! Each repository is responsible for a single domain entity. Services depend
//! on the store traits defined here rather than on the concrete repositories.

pub mod video;

pub use video::{VideoRepository, VideoStore};
