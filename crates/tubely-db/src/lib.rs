//! Tubely Database Library
//!
//! Repositories over PostgreSQL for the metadata records the ingestion
//! pipeline reads and mutates.

pub mod db;

pub use db::{VideoRepository, VideoStore};
