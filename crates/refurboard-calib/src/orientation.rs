use refurboard_core::{PixelCoordinate, SurfaceSize};
use serde::{Deserialize, Serialize};

/// Clockwise rotation of the camera relative to the screen, in quarter turns.
///
/// Derived from where the screen's top-left corner shows up in the camera
/// frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraOrientation {
    #[default]
    Upright,
    Clockwise90,
    UpsideDown,
    Clockwise270,
}

impl CameraOrientation {
    /// Classify by the quadrant of `top_left` around the frame centre.
    ///
    /// Upper-left is upright, upper-right 90°, lower-right 180°; anything
    /// else (including points on a centre line) is 270°.
    pub fn detect(top_left: PixelCoordinate, frame: SurfaceSize) -> Self {
        let cx = frame.width / 2.0;
        let cy = frame.height / 2.0;
        let nx = if cx > 0.0 { (top_left.x - cx) / cx } else { 0.0 };
        let ny = if cy > 0.0 { (top_left.y - cy) / cy } else { 0.0 };

        if nx < 0.0 && ny < 0.0 {
            Self::Upright
        } else if nx > 0.0 && ny < 0.0 {
            Self::Clockwise90
        } else if nx > 0.0 && ny > 0.0 {
            Self::UpsideDown
        } else {
            Self::Clockwise270
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Self::Upright => 0,
            Self::Clockwise90 => 90,
            Self::UpsideDown => 180,
            Self::Clockwise270 => 270,
        }
    }
}
