use refurboard_core::{NormalizedCoordinate, PixelCoordinate, SurfaceSize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of the surface between a drawn calibration target and the edges.
pub const TARGET_INSET: f64 = 0.035;

/// Screen corner, listed clockwise from the top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerName {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,
    Bottom,
}

/// Where a UI should pin the visual target for a corner. Presentation only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetAlignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
}

impl CornerName {
    /// Capture order and the order of the homography correspondences.
    pub const CLOCKWISE: [CornerName; 4] = [
        CornerName::TopLeft,
        CornerName::TopRight,
        CornerName::BottomRight,
        CornerName::BottomLeft,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomRight => 2,
            Self::BottomLeft => 3,
        }
    }

    /// The corner of the unit square this name stands for.
    pub fn canonical_target(self) -> NormalizedCoordinate {
        match self {
            Self::TopLeft => NormalizedCoordinate::new(0.0, 0.0),
            Self::TopRight => NormalizedCoordinate::new(1.0, 0.0),
            Self::BottomRight => NormalizedCoordinate::new(1.0, 1.0),
            Self::BottomLeft => NormalizedCoordinate::new(0.0, 1.0),
        }
    }

    pub fn alignment(self) -> TargetAlignment {
        let horizontal = match self {
            Self::TopLeft | Self::BottomLeft => HorizontalAlignment::Left,
            Self::TopRight | Self::BottomRight => HorizontalAlignment::Right,
        };
        let vertical = match self {
            Self::TopLeft | Self::TopRight => VerticalAlignment::Top,
            Self::BottomRight | Self::BottomLeft => VerticalAlignment::Bottom,
        };
        TargetAlignment {
            horizontal,
            vertical,
        }
    }

    /// Suggested centre of the drawn target, pulled in from the corner by
    /// [`TARGET_INSET`] so it stays fully visible.
    pub fn target_position(self, surface: SurfaceSize) -> PixelCoordinate {
        let c = self.canonical_target();
        let inset = |v: f64| TARGET_INSET + v * (1.0 - 2.0 * TARGET_INSET);
        PixelCoordinate::new(inset(c.x) * surface.width, inset(c.y) * surface.height)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top_left",
            Self::TopRight => "top_right",
            Self::BottomRight => "bottom_right",
            Self::BottomLeft => "bottom_left",
        }
    }
}

impl fmt::Display for CornerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded corner tap. Immutable once recorded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerObservation {
    pub name: CornerName,
    /// Raw capture-surface pixel where the corner was observed.
    pub pixel: PixelCoordinate,
    /// `pixel` divided by the capture-surface size at capture time.
    pub normalized: NormalizedCoordinate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clockwise_order_matches_indices() {
        for (i, c) in CornerName::CLOCKWISE.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn alignment_follows_the_corner() {
        let a = CornerName::BottomRight.alignment();
        assert_eq!(a.horizontal, HorizontalAlignment::Right);
        assert_eq!(a.vertical, VerticalAlignment::Bottom);
        let a = CornerName::TopLeft.alignment();
        assert_eq!(a.horizontal, HorizontalAlignment::Left);
        assert_eq!(a.vertical, VerticalAlignment::Top);
    }

    #[test]
    fn target_position_is_inset() {
        let p = CornerName::TopRight.target_position(SurfaceSize::new(1000.0, 500.0));
        assert!((p.x - 965.0).abs() < 1e-9);
        assert!((p.y - 17.5).abs() < 1e-9);
    }

    #[test]
    fn names_serialize_in_snake_case() {
        let json = serde_json::to_string(&CornerName::BottomLeft).unwrap();
        assert_eq!(json, "\"bottom_left\"");
        assert_eq!(CornerName::BottomLeft.to_string(), "bottom_left");
    }
}
