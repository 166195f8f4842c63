use refurboard_core::ScreenBounds;
use serde::{Deserialize, Serialize};

use crate::corner::{CornerName, CornerObservation};
use crate::dwell::LearnedThresholds;
use crate::orientation::CameraOrientation;

/// Persisted result of a calibration run.
///
/// `corners[*].pixel` are camera pixels; `screen_bounds` is the display the
/// mapping targets. Only whole profiles are ever stored as current.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    pub corners: Vec<CornerObservation>,
    #[serde(rename = "screen_bounds_px")]
    pub screen_bounds: ScreenBounds,
    /// Seconds since the Unix epoch, supplied by the caller.
    pub completed_at: f64,
    pub device_fingerprint: String,
    /// Mean distance in screen pixels between the projected calibration
    /// points and their targets.
    #[serde(default)]
    pub reprojection_error: Option<f64>,
    #[serde(default)]
    pub camera_orientation: Option<CameraOrientation>,
    #[serde(default)]
    pub learned: Option<LearnedThresholds>,
}

impl CalibrationProfile {
    /// All four named corners present and positive screen bounds.
    pub fn is_usable(&self) -> bool {
        self.screen_bounds.is_valid()
            && CornerName::CLOCKWISE
                .iter()
                .all(|name| self.corner(*name).is_some())
    }

    /// Observation for `name`; the last one wins if the name repeats.
    pub fn corner(&self, name: CornerName) -> Option<&CornerObservation> {
        self.corners.iter().rev().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refurboard_core::{NormalizedCoordinate, PixelCoordinate};

    fn obs(name: CornerName, x: f64, y: f64) -> CornerObservation {
        CornerObservation {
            name,
            pixel: PixelCoordinate::new(x, y),
            normalized: NormalizedCoordinate::default(),
        }
    }

    fn profile(corners: Vec<CornerObservation>, bounds: ScreenBounds) -> CalibrationProfile {
        CalibrationProfile {
            corners,
            screen_bounds: bounds,
            completed_at: 1_700_000_000.0,
            device_fingerprint: "cam-0".into(),
            reprojection_error: None,
            camera_orientation: None,
            learned: None,
        }
    }

    #[test]
    fn usable_needs_every_corner_and_bounds() {
        let all = vec![
            obs(CornerName::TopLeft, 0.0, 0.0),
            obs(CornerName::TopRight, 1.0, 0.0),
            obs(CornerName::BottomRight, 1.0, 1.0),
            obs(CornerName::BottomLeft, 0.0, 1.0),
        ];
        assert!(profile(all.clone(), ScreenBounds::new(10, 10)).is_usable());
        assert!(!profile(all.clone(), ScreenBounds::new(0, 10)).is_usable());
        assert!(!profile(all[..3].to_vec(), ScreenBounds::new(10, 10)).is_usable());
    }

    #[test]
    fn repeated_corner_resolves_to_last() {
        let p = profile(
            vec![
                obs(CornerName::TopLeft, 1.0, 1.0),
                obs(CornerName::TopLeft, 7.0, 9.0),
            ],
            ScreenBounds::new(10, 10),
        );
        assert_eq!(
            p.corner(CornerName::TopLeft).map(|c| c.pixel),
            Some(PixelCoordinate::new(7.0, 9.0))
        );
    }

    #[test]
    fn older_files_without_optional_fields_load() {
        let json = r#"{
            "corners": [
                {"name": "top_left", "pixel": {"x": 1.0, "y": 2.0}, "normalized": {"x": 0.1, "y": 0.2}}
            ],
            "screen_bounds_px": {"width": 1920, "height": 1080},
            "completed_at": 12.5,
            "device_fingerprint": "usb:046d:0825"
        }"#;
        let p: CalibrationProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.screen_bounds, ScreenBounds::new(1920, 1080));
        assert_eq!(p.corners[0].name, CornerName::TopLeft);
        assert!(p.reprojection_error.is_none() && p.learned.is_none());

        let back: CalibrationProfile =
            serde_json::from_str(&serde_json::to_string(&p).unwrap()).unwrap();
        assert_eq!(back, p);
    }
}
