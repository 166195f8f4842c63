//! Grid-sampled IR blob detection on BGRA8888 frames.

mod error;
mod params;
mod scan;

pub use error::DetectError;
pub use params::{BlobDetectorParams, ThresholdProfile, MAX_BLOBS_LIMIT};
pub use scan::{BlobDetector, SAMPLE_CONFIDENCE};
