//! Tubely Storage Library
//!
//! This crate provides the object storage abstraction used to publish ingested
//! videos, with implementations for S3 (through `object_store`) and the local
//! filesystem.
//!
//! # Storage key format
//!
//! Keys are derived once per upload and never reused:
//!
//! - **With an aspect class**: `{landscape|portrait|other}/{id}.{ext}`
//! - **Without**: `{id}.{ext}`
//!
//! `id` is 32 bytes of CSPRNG output, URL-safe base64 without padding. Key
//! generation lives in the `keys` module so every backend sees the same layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::StorageKey;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
