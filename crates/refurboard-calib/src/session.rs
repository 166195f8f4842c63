//! Interactive four-corner capture.
//!
//! The user is walked through the corners in clockwise order starting at the
//! top-left; each step takes exactly one point. After the fourth point the
//! session is complete and registered listeners are notified once.

use log::{debug, info};
use refurboard_core::{PixelCoordinate, ScreenBounds, SurfaceSize};
use serde::{Deserialize, Serialize};

use crate::corner::{CornerName, CornerObservation, TargetAlignment};
use crate::profile::CalibrationProfile;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("calibration incomplete: {recorded} of 4 corners recorded")]
    Incomplete { recorded: usize },
}

/// The corner currently awaiting a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureStep {
    /// 0-based position in the clockwise sequence.
    pub index: usize,
    pub corner: CornerName,
}

impl CaptureStep {
    /// Presentation hint for drawing this step's target.
    pub fn alignment(&self) -> TargetAlignment {
        self.corner.alignment()
    }

    pub fn target_position(&self, surface: SurfaceSize) -> PixelCoordinate {
        self.corner.target_position(surface)
    }
}

type CompletionListener = Box<dyn FnMut(&[CornerObservation]) + Send>;

/// One calibration run. Drop or [`CalibrationSession::cancel`] it to
/// discard everything recorded so far.
#[derive(Default)]
pub struct CalibrationSession {
    observations: Vec<CornerObservation>,
    listeners: Vec<CompletionListener>,
}

impl std::fmt::Debug for CalibrationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalibrationSession")
            .field("observations", &self.observations)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CalibrationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback fired once when the fourth corner is recorded.
    pub fn on_complete(&mut self, listener: impl FnMut(&[CornerObservation]) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn current_step(&self) -> Option<CaptureStep> {
        CornerName::CLOCKWISE
            .get(self.observations.len())
            .map(|&corner| CaptureStep {
                index: self.observations.len(),
                corner,
            })
    }

    pub fn is_complete(&self) -> bool {
        self.observations.len() == CornerName::CLOCKWISE.len()
    }

    pub fn observations(&self) -> &[CornerObservation] {
        &self.observations
    }

    /// Record the point for the current step and advance.
    ///
    /// The point is clamped into the surface before normalizing; a
    /// non-positive surface dimension normalizes to 0 on that axis. Returns
    /// the corner that was recorded, or `None` if the session was already
    /// complete (the call is then a no-op).
    pub fn record_point(
        &mut self,
        raw: PixelCoordinate,
        surface: SurfaceSize,
    ) -> Option<CornerName> {
        let step = self.current_step()?;

        let pixel = raw.clamp_to(surface.width, surface.height);
        let normalized = pixel.normalize_by(surface.width, surface.height);
        self.observations.push(CornerObservation {
            name: step.corner,
            pixel,
            normalized,
        });
        debug!(
            "recorded {} at ({:.1}, {:.1})",
            step.corner, pixel.x, pixel.y
        );

        if self.is_complete() {
            info!("calibration capture complete");
            for listener in self.listeners.iter_mut() {
                listener(&self.observations);
            }
        }
        Some(step.corner)
    }

    /// Package the four observations with the final surface size.
    pub fn to_outcome(&self, final_bounds: SurfaceSize) -> Result<CalibrationOutcome, CaptureError> {
        if !self.is_complete() {
            return Err(CaptureError::Incomplete {
                recorded: self.observations.len(),
            });
        }
        Ok(CalibrationOutcome {
            corners: self.observations.clone(),
            screen_bounds: final_bounds.rounded(),
        })
    }

    /// Abandon the run. Returns how many points were thrown away.
    pub fn cancel(self) -> usize {
        let dropped = self.observations.len();
        if dropped > 0 {
            info!("calibration cancelled, discarding {dropped} corner(s)");
        }
        dropped
    }
}

/// Result of a finished capture: the corner set plus the screen size it was
/// recorded against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOutcome {
    pub corners: Vec<CornerObservation>,
    pub screen_bounds: ScreenBounds,
}

impl CalibrationOutcome {
    /// Attach the externally supplied timestamp and device fingerprint.
    pub fn into_profile(
        self,
        completed_at: f64,
        device_fingerprint: impl Into<String>,
    ) -> CalibrationProfile {
        CalibrationProfile {
            corners: self.corners,
            screen_bounds: self.screen_bounds,
            completed_at,
            device_fingerprint: device_fingerprint.into(),
            reprojection_error: None,
            camera_orientation: None,
            learned: None,
        }
    }
}
