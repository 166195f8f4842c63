//! High-level facade crate for the `refurboard-*` workspace.
//!
//! Refurboard tracks an infrared pen with an ordinary camera and turns its
//! position into a calibrated on-screen cursor, so any projector or display
//! can act as an interactive whiteboard.
//!
//! This crate provides:
//! - re-exports of the underlying crates,
//! - (feature `image`) helpers that load image files as BGRA frames,
//! - (feature `cli`) the `refurboard` command-line tool.
//!
//! ## Quickstart
//!
//! ```
//! use std::sync::Arc;
//! use refurboard::calib::{CalibrationSession, finalize_calibration};
//! use refurboard::core::{PixelCoordinate, SurfaceSize};
//! use refurboard::detect::{IrBlob, IrBlobFrame};
//! use refurboard::pointer::{NoopSink, PointerPipeline};
//!
//! let camera = SurfaceSize::new(1000.0, 800.0);
//! let mut session = CalibrationSession::new();
//! for (x, y) in [(0.0, 0.0), (1000.0, 0.0), (1000.0, 800.0), (0.0, 800.0)] {
//!     session.record_point(PixelCoordinate::new(x, y), camera);
//! }
//! let outcome = session.to_outcome(SurfaceSize::new(1920.0, 1080.0))?;
//! let (_profile, mapping) = finalize_calibration(outcome, 0.0, "cam-0")?;
//!
//! let pipeline = PointerPipeline::new(mapping, Arc::new(NoopSink));
//! let blob = IrBlob {
//!     pixel: PixelCoordinate::new(500.0, 400.0),
//!     area: 9.0,
//!     intensity: 0.9,
//!     confidence: 0.8,
//! };
//! let sample = pipeline.process_frame(&IrBlobFrame::new(0.0, vec![blob]));
//! assert!(sample.is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## API map
//! - `refurboard::core`: coordinates, screen bounds, BGRA frames, the 4-point homography.
//! - `refurboard::detect`: grid-sampled IR blob detection and pen-tip selection.
//! - `refurboard::calib`: corner capture, calibration profiles, homography mapping, config.
//! - `refurboard::pointer`: pointer pipeline, sinks, tracker and frame loop.
//! - `refurboard::frames` (feature `image`): image files to BGRA frames.

pub use refurboard_calib as calib;
pub use refurboard_core as core;
pub use refurboard_detect as detect;
pub use refurboard_pointer as pointer;

pub use refurboard_calib::{CalibrationProfile, HomographyMapping, RefurboardConfig};
pub use refurboard_core::{NormalizedCoordinate, PixelCoordinate, ScreenBounds};
pub use refurboard_pointer::{PointerPipeline, PointerTracker, ProjectedPointerSample};

#[cfg(feature = "image")]
pub mod frames;
