//! Ingestion services
//!
//! One orchestrator per media kind. Each takes an authenticated caller and an
//! uploaded file through a fixed sequence of stages and returns the updated
//! record; a failure at any stage stops the pipeline before the record is
//! touched.

pub mod thumbnail;
pub mod types;
pub mod video;

pub use thumbnail::{StoredThumbnail, ThumbnailIngestor};
pub use types::UploadedFile;
pub use video::{VideoIngestor, VideoIngestorConfig};
