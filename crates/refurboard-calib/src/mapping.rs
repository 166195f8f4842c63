use std::collections::HashMap;

use log::{debug, info, warn};
use nalgebra::Point2;
use refurboard_core::{
    homography_from_4pt, Homography, NormalizedCoordinate, PixelCoordinate, ScreenBounds,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::corner::CornerName;
use crate::profile::CalibrationProfile;
use crate::session::CalibrationOutcome;

/// Reasons a profile cannot be turned into a mapping. The messages are meant
/// for display to the user.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("no calibration profile available")]
    MissingProfile,
    #[error("missing four corner observations (found {found})")]
    TooFewCorners { found: usize },
    #[error("invalid screen dimensions {width}x{height}")]
    InvalidScreenBounds { width: u32, height: u32 },
    #[error("calibration is missing the {0} corner")]
    MissingCorner(CornerName),
    #[error("calibration corners are degenerate; no perspective transform fits them")]
    DegenerateSolve,
}

/// Camera-pixel to screen-pixel perspective mapping built from a usable
/// calibration profile. Immutable; rebuild it when the profile changes.
#[derive(Clone, Debug, PartialEq)]
pub struct HomographyMapping {
    homography: Homography,
    screen_bounds: ScreenBounds,
    reprojection_error: f64,
}

impl HomographyMapping {
    /// Validate `profile` and solve for the mapping.
    ///
    /// Checks run in order and the first failure is returned: missing
    /// profile, fewer than four corners, non-positive screen bounds, a named
    /// corner absent after de-duplication (the last repeat of a name wins),
    /// and finally a degenerate solve.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(profile)))]
    pub fn try_create(profile: Option<&CalibrationProfile>) -> Result<Self, MappingError> {
        let profile = profile.ok_or(MappingError::MissingProfile)?;

        if profile.corners.len() < 4 {
            return Err(MappingError::TooFewCorners {
                found: profile.corners.len(),
            });
        }

        let bounds = profile.screen_bounds;
        if !bounds.is_valid() {
            return Err(MappingError::InvalidScreenBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }

        let mut by_name = HashMap::with_capacity(4);
        for c in &profile.corners {
            if by_name.insert(c.name, c.pixel).is_some() {
                debug!("duplicate {} observation, keeping the later one", c.name);
            }
        }

        let mut camera = [Point2::origin(); 4];
        let mut screen = [Point2::origin(); 4];
        for name in CornerName::CLOCKWISE {
            let pixel = by_name
                .get(&name)
                .ok_or(MappingError::MissingCorner(name))?;
            let target = name.canonical_target().to_pixel(bounds);
            camera[name.index()] = pixel.to_point();
            screen[name.index()] = target.to_point();
        }

        let homography = homography_from_4pt(&camera, &screen).ok_or_else(|| {
            warn!("calibration corners do not admit a homography");
            MappingError::DegenerateSolve
        })?;

        let reprojection_error = mean_reprojection_error(&homography, &camera, &screen)
            .ok_or(MappingError::DegenerateSolve)?;

        info!(
            "homography mapping ready for {}x{} (reprojection error {:.3} px)",
            bounds.width, bounds.height, reprojection_error
        );
        Ok(Self {
            homography,
            screen_bounds: bounds,
            reprojection_error,
        })
    }

    pub fn try_from_profile(profile: &CalibrationProfile) -> Result<Self, MappingError> {
        Self::try_create(Some(profile))
    }

    /// Unclamped screen pixel for a camera pixel, or `None` near the horizon
    /// line of the transform.
    #[inline]
    pub fn try_project(&self, camera: PixelCoordinate) -> Option<PixelCoordinate> {
        self.homography
            .try_apply(camera.to_point())
            .map(PixelCoordinate::from)
    }

    /// [`Self::try_project`] divided by the screen size (each axis at least 1).
    pub fn try_project_normalized(&self, camera: PixelCoordinate) -> Option<NormalizedCoordinate> {
        let p = self.try_project(camera)?;
        Some(NormalizedCoordinate::new(
            p.x / self.screen_bounds.width_f64().max(1.0),
            p.y / self.screen_bounds.height_f64().max(1.0),
        ))
    }

    /// Row-major coefficients.
    pub fn matrix(&self) -> [f64; 9] {
        self.homography.to_row_major()
    }

    pub fn homography(&self) -> &Homography {
        &self.homography
    }

    pub fn screen_bounds(&self) -> ScreenBounds {
        self.screen_bounds
    }

    /// Mean screen-pixel distance between the projected calibration corners
    /// and their targets.
    pub fn reprojection_error(&self) -> f64 {
        self.reprojection_error
    }
}

fn mean_reprojection_error(
    h: &Homography,
    camera: &[Point2<f64>; 4],
    screen: &[Point2<f64>; 4],
) -> Option<f64> {
    let mut sum = 0.0;
    for (c, s) in camera.iter().zip(screen) {
        let p = h.try_apply(*c)?;
        sum += (p - *s).norm();
    }
    Some(sum / 4.0)
}

/// Turn a finished capture into a stored profile plus its mapping.
///
/// The profile carries the reprojection error of the solved mapping. On
/// failure nothing is returned, so there is nothing to persist.
pub fn finalize_calibration(
    outcome: CalibrationOutcome,
    completed_at: f64,
    device_fingerprint: impl Into<String>,
) -> Result<(CalibrationProfile, HomographyMapping), MappingError> {
    let mut profile = outcome.into_profile(completed_at, device_fingerprint);
    let mapping = HomographyMapping::try_from_profile(&profile)?;
    profile.reprojection_error = Some(mapping.reprojection_error());
    Ok((profile, mapping))
}
