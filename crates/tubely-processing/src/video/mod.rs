//! Video processing module

pub mod aspect;
pub mod probe;
pub mod remux;

pub use aspect::{classify, ASPECT_TOLERANCE};
pub use probe::{GeometryProber, VideoGeometry};
pub use remux::FaststartRemuxer;
