use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A point in camera-pixel or screen-pixel space.
///
/// The coordinate carries no bounds of its own; which space it lives in is
/// decided by the code handling it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub x: f64,
    pub y: f64,
}

impl PixelCoordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Saturate into `[0, width] x [0, height]`.
    ///
    /// Non-positive dimensions collapse the corresponding axis onto 0.
    pub fn clamp_to(self, width: f64, height: f64) -> Self {
        Self {
            x: clamp_axis(self.x, width),
            y: clamp_axis(self.y, height),
        }
    }

    /// Divide by the given dimensions, mapping non-positive dimensions to 0.
    pub fn normalize_by(self, width: f64, height: f64) -> NormalizedCoordinate {
        NormalizedCoordinate {
            x: safe_ratio(self.x, width),
            y: safe_ratio(self.y, height),
        }
    }

    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn to_point(self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

impl From<Point2<f64>> for PixelCoordinate {
    fn from(p: Point2<f64>) -> Self {
        Self::new(p.x, p.y)
    }
}

/// A point relative to screen bounds, nominally inside `[0, 1] x [0, 1]`.
///
/// Only produced by projection or normalization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCoordinate {
    pub x: f64,
    pub y: f64,
}

impl NormalizedCoordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale back into pixel space for the given bounds.
    pub fn to_pixel(self, bounds: ScreenBounds) -> PixelCoordinate {
        PixelCoordinate::new(self.x * bounds.width as f64, self.y * bounds.height as f64)
    }
}

/// Integer pixel size of the display a calibration was performed against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenBounds {
    pub width: u32,
    pub height: u32,
}

impl ScreenBounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub fn width_f64(&self) -> f64 {
        self.width as f64
    }

    #[inline]
    pub fn height_f64(&self) -> f64 {
        self.height as f64
    }
}

/// Floating-point size of an interactive surface (e.g. the calibration
/// overlay), as reported by the windowing layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Round to whole pixels. Negative or NaN sizes become 0.
    pub fn rounded(&self) -> ScreenBounds {
        ScreenBounds {
            width: round_dimension(self.width),
            height: round_dimension(self.height),
        }
    }
}

impl From<ScreenBounds> for SurfaceSize {
    fn from(b: ScreenBounds) -> Self {
        Self::new(b.width as f64, b.height as f64)
    }
}

fn clamp_axis(v: f64, extent: f64) -> f64 {
    let hi = if extent > 0.0 { extent } else { 0.0 };
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, hi)
}

fn safe_ratio(v: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        v / extent
    } else {
        0.0
    }
}

fn round_dimension(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_saturates_both_axes() {
        let p = PixelCoordinate::new(-12.0, 5000.0).clamp_to(1920.0, 1080.0);
        assert_eq!(p, PixelCoordinate::new(0.0, 1080.0));

        let inside = PixelCoordinate::new(10.0, 20.0).clamp_to(1920.0, 1080.0);
        assert_eq!(inside, PixelCoordinate::new(10.0, 20.0));
    }

    #[test]
    fn clamp_with_degenerate_extent_collapses_to_zero() {
        let p = PixelCoordinate::new(30.0, f64::NAN).clamp_to(0.0, 100.0);
        assert_eq!(p, PixelCoordinate::new(0.0, 0.0));
    }

    #[test]
    fn normalize_guards_zero_extent() {
        let n = PixelCoordinate::new(50.0, 50.0).normalize_by(100.0, 0.0);
        assert_eq!(n, NormalizedCoordinate::new(0.5, 0.0));
    }

    #[test]
    fn json_field_names_are_stable() {
        let json = serde_json::to_string(&ScreenBounds::new(1920, 1080)).unwrap();
        assert_eq!(json, r#"{"width":1920,"height":1080}"#);

        let p: PixelCoordinate = serde_json::from_str(r#"{"x":1.5,"y":-2.0}"#).unwrap();
        assert_eq!(p, PixelCoordinate::new(1.5, -2.0));
    }

    #[test]
    fn surface_rounding_drops_negative() {
        assert_eq!(
            SurfaceSize::new(1919.6, -3.0).rounded(),
            ScreenBounds::new(1920, 0)
        );
    }
}
