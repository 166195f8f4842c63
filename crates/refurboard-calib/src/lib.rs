//! Screen calibration for camera-tracked whiteboard pens.
//!
//! A [`CalibrationSession`] walks the user through the four screen corners,
//! the finished outcome becomes a [`CalibrationProfile`], and a
//! [`HomographyMapping`] built from that profile projects camera pixels onto
//! the screen.
//!
//! ## Quickstart
//!
//! ```
//! use refurboard_calib::{finalize_calibration, CalibrationSession};
//! use refurboard_core::{PixelCoordinate, SurfaceSize};
//!
//! let camera = SurfaceSize::new(1000.0, 800.0);
//! let mut session = CalibrationSession::new();
//! for (x, y) in [(0.0, 0.0), (1000.0, 0.0), (1000.0, 800.0), (0.0, 800.0)] {
//!     session.record_point(PixelCoordinate::new(x, y), camera);
//! }
//!
//! let outcome = session.to_outcome(SurfaceSize::new(1920.0, 1080.0))?;
//! let (_profile, mapping) = finalize_calibration(outcome, 0.0, "cam-0")?;
//! let centre = mapping.try_project(PixelCoordinate::new(500.0, 400.0));
//! assert!(centre.is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod corner;
mod dwell;
mod io;
mod mapping;
mod orientation;
mod profile;
mod session;

pub use corner::{
    CornerName, CornerObservation, HorizontalAlignment, TargetAlignment, VerticalAlignment,
    TARGET_INSET,
};
pub use dwell::{CollectedPoint, DwellCollector, DwellParams, LearnedThresholds};
pub use io::{CameraSettings, ConfigError, ConfigIoError, DetectionSettings, RefurboardConfig};
pub use mapping::{finalize_calibration, HomographyMapping, MappingError};
pub use orientation::CameraOrientation;
pub use profile::CalibrationProfile;
pub use session::{CalibrationOutcome, CalibrationSession, CaptureError, CaptureStep};
