use serde::{Deserialize, Serialize};

use super::DetectError;

/// Upper bound for both the sampling stride and the blob budget.
pub const MAX_BLOBS_LIMIT: usize = 32;

/// Brightness and size gates for IR blob candidates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdProfile {
    /// Minimum normalized luma in `[0, 1]`.
    pub intensity: f64,
    /// Smallest blob area of interest, in square pixels. Also sets the
    /// sampling grid spacing (`sqrt(min_area)`).
    pub min_area: f64,
    pub max_area: f64,
}

impl Default for ThresholdProfile {
    fn default() -> Self {
        Self {
            intensity: 0.65,
            min_area: 5.0,
            max_area: 500.0,
        }
    }
}

impl ThresholdProfile {
    /// Check the ranges the configuration provider promises.
    pub fn validate(&self) -> Result<(), DetectError> {
        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(DetectError::InvalidThreshold {
                reason: format!("intensity {} outside [0, 1]", self.intensity),
            });
        }
        if !(self.min_area > 0.0) {
            return Err(DetectError::InvalidThreshold {
                reason: format!("min_area {} must be positive", self.min_area),
            });
        }
        if !(self.max_area >= self.min_area) {
            return Err(DetectError::InvalidThreshold {
                reason: format!(
                    "max_area {} smaller than min_area {}",
                    self.max_area, self.min_area
                ),
            });
        }
        Ok(())
    }

    /// Luma byte a sample must reach to count as IR-bright.
    pub fn byte_threshold(&self) -> u8 {
        (self.intensity.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Grid spacing in pixels, `floor(sqrt(min_area))` clamped to `[1, 32]`.
    pub fn sampling_stride(&self) -> usize {
        let side = self.min_area.max(0.0).sqrt();
        if side.is_finite() {
            (side as usize).clamp(1, 32)
        } else {
            1
        }
    }
}

/// Configuration for [`crate::BlobDetector`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlobDetectorParams {
    pub threshold: ThresholdProfile,
    /// Blob budget per frame; clamped to `[1, 32]` by the detector.
    #[serde(default = "default_max_blobs")]
    pub max_blobs: usize,
}

fn default_max_blobs() -> usize {
    8
}

impl Default for BlobDetectorParams {
    fn default() -> Self {
        Self {
            threshold: ThresholdProfile::default(),
            max_blobs: default_max_blobs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_follows_sqrt_min_area() {
        let mut t = ThresholdProfile::default();
        t.min_area = 5.0;
        assert_eq!(t.sampling_stride(), 2);
        t.min_area = 0.25;
        assert_eq!(t.sampling_stride(), 1);
        t.min_area = 100.0;
        assert_eq!(t.sampling_stride(), 10);
        t.min_area = 1.0e6;
        assert_eq!(t.sampling_stride(), 32);
    }

    #[test]
    fn byte_threshold_rounds() {
        let t = ThresholdProfile {
            intensity: 0.5,
            ..ThresholdProfile::default()
        };
        assert_eq!(t.byte_threshold(), 128);
        let full = ThresholdProfile {
            intensity: 1.0,
            ..ThresholdProfile::default()
        };
        assert_eq!(full.byte_threshold(), 255);
    }

    #[test]
    fn validation_rejects_out_of_range_profiles() {
        assert!(ThresholdProfile::default().validate().is_ok());
        let bad_intensity = ThresholdProfile {
            intensity: 1.5,
            ..ThresholdProfile::default()
        };
        assert!(bad_intensity.validate().is_err());
        let bad_area = ThresholdProfile {
            min_area: 0.0,
            ..ThresholdProfile::default()
        };
        assert!(bad_area.validate().is_err());
        let inverted = ThresholdProfile {
            min_area: 50.0,
            max_area: 10.0,
            ..ThresholdProfile::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn params_default_max_blobs_when_missing() {
        let params: BlobDetectorParams = serde_json::from_str(
            r#"{"threshold":{"intensity":0.7,"min_area":9.0,"max_area":400.0}}"#,
        )
        .unwrap();
        assert_eq!(params.max_blobs, 8);
        assert_eq!(params.threshold.sampling_stride(), 3);
    }
}
