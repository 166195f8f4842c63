//! Core types for IR whiteboard pointer tracking.
//!
//! This crate is small and purely geometric: pixel/normalized coordinates,
//! screen bounds, a borrowed BGRA frame view, and the 4-point homography
//! solver. It does not know about blobs, calibration sessions or cursors.

mod geometry;
mod homography;
mod image;
mod logger;

pub use geometry::{NormalizedCoordinate, PixelCoordinate, ScreenBounds, SurfaceSize};
pub use homography::{homography_from_4pt, Homography, W_EPSILON};
pub use image::{
    bytes_per_pixel, luma_bgr, FrameError, FrameView, OwnedFrame, PixelFormat,
    BGRA_BYTES_PER_PIXEL,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
