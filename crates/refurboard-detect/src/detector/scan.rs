use log::debug;
use refurboard_core::{luma_bgr, FrameView, PixelCoordinate, PixelFormat, BGRA_BYTES_PER_PIXEL};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::params::MAX_BLOBS_LIMIT;
use super::{BlobDetectorParams, DetectError};
use crate::blob::{IrBlob, IrBlobFrame};

/// Confidence assigned to every grid sample; the scan has no shape evidence
/// to grade candidates with.
pub const SAMPLE_CONFIDENCE: f64 = 0.8;

/// Grid-sampling IR blob detector.
///
/// Samples every `sqrt(min_area)`-th pixel on both axes instead of scanning
/// the full frame. Adjacent bright samples are reported as separate blobs;
/// there is no connected-component merging.
#[derive(Clone, Debug)]
pub struct BlobDetector {
    params: BlobDetectorParams,
}

impl BlobDetector {
    /// Create a detector; `max_blobs` is clamped into `[1, 32]`.
    pub fn new(mut params: BlobDetectorParams) -> Self {
        params.max_blobs = params.max_blobs.clamp(1, MAX_BLOBS_LIMIT);
        Self { params }
    }

    /// Like [`BlobDetector::new`], rejecting threshold profiles outside
    /// their documented ranges.
    pub fn try_new(params: BlobDetectorParams) -> Result<Self, DetectError> {
        params.threshold.validate()?;
        Ok(Self::new(params))
    }

    #[inline]
    pub fn params(&self) -> &BlobDetectorParams {
        &self.params
    }

    /// Scan one frame and return at most `max_blobs` candidates ordered by
    /// descending intensity.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width, height = frame.height))
    )]
    pub fn detect(&self, frame: &FrameView<'_>) -> Result<Vec<IrBlob>, DetectError> {
        if frame.format != PixelFormat::Bgra8888 {
            return Err(DetectError::UnsupportedFormat {
                format: frame.format,
            });
        }
        if frame.stride < frame.width * BGRA_BYTES_PER_PIXEL {
            return Err(DetectError::InvalidStride {
                stride: frame.stride,
                width: frame.width,
            });
        }

        let threshold = self.params.threshold.byte_threshold();
        let step = self.params.threshold.sampling_stride();
        let area = (step * step) as f64;
        let data = frame.data;

        let mut candidates = Vec::new();
        for y in (0..frame.height).step_by(step) {
            let row = y * frame.stride;
            for x in (0..frame.width).step_by(step) {
                let offset = row + x * BGRA_BYTES_PER_PIXEL;
                if offset + BGRA_BYTES_PER_PIXEL > data.len() {
                    break;
                }
                let luma = luma_bgr(data[offset], data[offset + 1], data[offset + 2]);
                if luma >= threshold as f32 {
                    candidates.push(IrBlob {
                        pixel: PixelCoordinate::new(x as f64, y as f64),
                        area,
                        intensity: (luma / 255.0) as f64,
                        confidence: SAMPLE_CONFIDENCE,
                    });
                }
            }
        }

        let sampled = candidates.len();
        // stable sort keeps scan order among equal intensities
        candidates.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));
        candidates.truncate(self.params.max_blobs);

        debug!(
            "scanned {}x{} frame (stride {step}, threshold {threshold}): {sampled} bright samples, kept {}",
            frame.width,
            frame.height,
            candidates.len()
        );

        Ok(candidates)
    }

    /// [`BlobDetector::detect`] packaged with the frame timestamp.
    pub fn detect_frame(&self, frame: &FrameView<'_>) -> Result<IrBlobFrame, DetectError> {
        Ok(IrBlobFrame::new(frame.timestamp, self.detect(frame)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThresholdProfile;
    use approx::assert_relative_eq;

    fn black_frame(width: usize, height: usize) -> Vec<u8> {
        let mut data = vec![0u8; width * height * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        data
    }

    fn paint(data: &mut [u8], width: usize, x: usize, y: usize, bgr: [u8; 3]) {
        let o = (y * width + x) * 4;
        data[o..o + 3].copy_from_slice(&bgr);
    }

    fn detector(min_area: f64, max_blobs: usize) -> BlobDetector {
        BlobDetector::new(BlobDetectorParams {
            threshold: ThresholdProfile {
                intensity: 0.5,
                min_area,
                max_area: 500.0,
            },
            max_blobs,
        })
    }

    #[test]
    fn dark_frame_yields_empty_list() {
        let data = black_frame(16, 16);
        let frame = FrameView::bgra(16, 16, &data, 1.0);
        let blobs = detector(1.0, 8).detect(&frame).unwrap();
        assert!(blobs.is_empty());
    }

    #[test]
    fn bright_samples_are_sorted_by_intensity() {
        let mut data = black_frame(8, 8);
        paint(&mut data, 8, 2, 2, [200, 200, 200]);
        paint(&mut data, 8, 6, 4, [255, 255, 255]);
        let frame = FrameView::bgra(8, 8, &data, 0.0);

        let blobs = detector(4.0, 8).detect(&frame).unwrap();
        assert_eq!(blobs.len(), 2);
        assert_eq!(blobs[0].pixel, PixelCoordinate::new(6.0, 4.0));
        assert_relative_eq!(blobs[0].intensity, 1.0, epsilon = 1e-4);
        assert_eq!(blobs[1].pixel, PixelCoordinate::new(2.0, 2.0));
        assert_eq!(blobs[0].area, 4.0);
        assert_eq!(blobs[0].confidence, SAMPLE_CONFIDENCE);
    }

    #[test]
    fn off_grid_pixels_are_not_sampled() {
        let mut data = black_frame(8, 8);
        paint(&mut data, 8, 3, 3, [255, 255, 255]);
        let frame = FrameView::bgra(8, 8, &data, 0.0);
        assert!(detector(4.0, 8).detect(&frame).unwrap().is_empty());
        assert_eq!(detector(1.0, 8).detect(&frame).unwrap().len(), 1);
    }

    #[test]
    fn luma_uses_bgr_channel_order() {
        let mut data = black_frame(4, 1);
        // pure red in BGRA: only R counts with weight 0.299 -> below 0.5
        paint(&mut data, 4, 0, 0, [0, 0, 255]);
        // pure green: weight 0.587 -> above 0.5
        paint(&mut data, 4, 1, 0, [0, 255, 0]);
        let frame = FrameView::bgra(4, 1, &data, 0.0);
        let blobs = detector(1.0, 8).detect(&frame).unwrap();
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].pixel, PixelCoordinate::new(1.0, 0.0));
    }

    #[test]
    fn result_is_truncated_to_budget() {
        let data = vec![255u8; 10 * 10 * 4];
        let frame = FrameView::bgra(10, 10, &data, 0.0);
        assert_eq!(detector(1.0, 3).detect(&frame).unwrap().len(), 3);
        assert_eq!(detector(1.0, 0).detect(&frame).unwrap().len(), 1);
        assert_eq!(detector(1.0, 500).detect(&frame).unwrap().len(), 32);
    }

    #[test]
    fn short_buffer_stops_scanning_instead_of_overrunning() {
        let data = vec![255u8; 4 * 4 * 4 - 2];
        let frame = FrameView::bgra(4, 4, &data, 0.0);
        let blobs = detector(1.0, 32).detect(&frame).unwrap();
        // last pixel of the last row is cut off
        assert_eq!(blobs.len(), 15);
    }

    #[test]
    fn non_bgra_frames_are_rejected() {
        let data = vec![255u8; 16];
        let frame = FrameView {
            format: PixelFormat::Rgba8888,
            ..FrameView::bgra(2, 2, &data, 0.0)
        };
        let err = detector(1.0, 8).detect(&frame).unwrap_err();
        assert_eq!(
            err,
            DetectError::UnsupportedFormat {
                format: PixelFormat::Rgba8888
            }
        );
    }

    #[test]
    fn overlapping_rows_are_rejected() {
        let data = vec![255u8; 64];
        let frame = FrameView {
            stride: 8,
            ..FrameView::bgra(4, 4, &data, 0.0)
        };
        let err = detector(1.0, 8).detect(&frame).unwrap_err();
        assert_eq!(err, DetectError::InvalidStride { stride: 8, width: 4 });
    }

    #[test]
    fn detect_frame_carries_timestamp() {
        let data = black_frame(2, 2);
        let frame = FrameView::bgra(2, 2, &data, 12.5);
        let out = detector(1.0, 8).detect_frame(&frame).unwrap();
        assert_eq!(out.timestamp, 12.5);
        assert!(out.is_empty());
    }
}
