//! IR blob detection for camera-tracked whiteboard pens.
//!
//! Current focus:
//! - grid-sampled bright-spot detection on BGRA8888 frames,
//! - single pen-tip selection by a weighted area/intensity/confidence score,
//! - an adaptive intensity trigger for click detection.
//!
//! Geometry and frame types live in `refurboard-core`.

mod blob;
mod click;
mod detector;
mod selector;

pub use blob::{IrBlob, IrBlobFrame};
pub use click::ClickTrigger;
pub use detector::{
    BlobDetector, BlobDetectorParams, DetectError, ThresholdProfile, MAX_BLOBS_LIMIT,
    SAMPLE_CONFIDENCE,
};
pub use selector::{BlobSelector, SelectionWeights};
