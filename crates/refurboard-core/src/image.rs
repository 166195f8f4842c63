use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes per pixel of the only layout the detector accepts.
pub const BGRA_BYTES_PER_PIXEL: usize = 4;

/// Pixel layout tag reported by a frame source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    Bgra8888,
    Rgba8888,
    Rgb888,
    Gray8,
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bgra8888 => "BGRA8888",
            Self::Rgba8888 => "RGBA8888",
            Self::Rgb888 => "RGB888",
            Self::Gray8 => "GRAY8",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid frame buffer length (expected at least {expected} bytes, got {got})")]
    BufferTooSmall { expected: usize, got: usize },
    #[error("row stride {stride} is smaller than one row of {width} pixels")]
    StrideTooSmall { stride: usize, width: usize },
}

/// Borrowed view of one captured camera frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub format: PixelFormat,
    pub width: usize,
    pub height: usize,
    /// Bytes between the starts of consecutive rows.
    pub stride: usize,
    pub data: &'a [u8],
    /// Capture time in seconds, on whatever clock the source uses.
    pub timestamp: f64,
}

impl<'a> FrameView<'a> {
    /// Tightly packed BGRA8888 view (`stride = width * 4`).
    pub fn bgra(width: usize, height: usize, data: &'a [u8], timestamp: f64) -> Self {
        Self {
            format: PixelFormat::Bgra8888,
            width,
            height,
            stride: width * BGRA_BYTES_PER_PIXEL,
            data,
            timestamp,
        }
    }
}

/// Owned frame buffer, as handed from a producer thread to the frame loop.
#[derive(Clone, Debug)]
pub struct OwnedFrame {
    pub format: PixelFormat,
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    pub data: Vec<u8>,
    pub timestamp: f64,
}

impl OwnedFrame {
    /// Wrap a packed BGRA8888 buffer, checking that it covers every row.
    pub fn from_bgra(
        width: usize,
        height: usize,
        data: Vec<u8>,
        timestamp: f64,
    ) -> Result<Self, FrameError> {
        Self::with_stride(
            PixelFormat::Bgra8888,
            width,
            height,
            width * BGRA_BYTES_PER_PIXEL,
            data,
            timestamp,
        )
    }

    pub fn with_stride(
        format: PixelFormat,
        width: usize,
        height: usize,
        stride: usize,
        data: Vec<u8>,
        timestamp: f64,
    ) -> Result<Self, FrameError> {
        let row_bytes = width * bytes_per_pixel(format);
        if stride < row_bytes {
            return Err(FrameError::StrideTooSmall { stride, width });
        }
        let expected = if height == 0 {
            0
        } else {
            stride * (height - 1) + row_bytes
        };
        if data.len() < expected {
            return Err(FrameError::BufferTooSmall {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            format,
            width,
            height,
            stride,
            data,
            timestamp,
        })
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            format: self.format,
            width: self.width,
            height: self.height,
            stride: self.stride,
            data: &self.data,
            timestamp: self.timestamp,
        }
    }
}

pub fn bytes_per_pixel(format: PixelFormat) -> usize {
    match format {
        PixelFormat::Bgra8888 | PixelFormat::Rgba8888 => 4,
        PixelFormat::Rgb888 => 3,
        PixelFormat::Gray8 => 1,
    }
}

/// Rec.601 luma of a BGR triple, in `[0, 255]`.
#[inline]
pub fn luma_bgr(b: u8, g: u8, r: u8) -> f32 {
    b as f32 * 0.114 + g as f32 * 0.587 + r as f32 * 0.299
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_weights_sum_to_white() {
        assert!((luma_bgr(255, 255, 255) - 255.0).abs() < 1e-3);
        assert_eq!(luma_bgr(0, 0, 0), 0.0);
        assert!(luma_bgr(0, 255, 0) > luma_bgr(0, 0, 255));
    }

    #[test]
    fn owned_frame_rejects_short_buffers() {
        let err = OwnedFrame::from_bgra(4, 2, vec![0; 20], 0.0).unwrap_err();
        assert_eq!(
            err,
            FrameError::BufferTooSmall {
                expected: 32,
                got: 20
            }
        );
    }

    #[test]
    fn padded_rows_need_only_a_partial_last_row() {
        let frame =
            OwnedFrame::with_stride(PixelFormat::Bgra8888, 2, 2, 12, vec![0; 20], 0.5).unwrap();
        let view = frame.view();
        assert_eq!(view.stride, 12);
        assert_eq!(view.timestamp, 0.5);
    }
}
