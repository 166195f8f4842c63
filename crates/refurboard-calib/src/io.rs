use std::fs;
use std::path::Path;

use log::info;
use refurboard_core::SurfaceSize;
use refurboard_detect::{BlobDetector, BlobDetectorParams, DetectError, ThresholdProfile};
use serde::{Deserialize, Serialize};

use crate::corner::CornerName;
use crate::mapping::{HomographyMapping, MappingError};
use crate::orientation::CameraOrientation;
use crate::profile::CalibrationProfile;

#[derive(thiserror::Error, Debug)]
pub enum ConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Capture device settings, consumed by whatever frame source the host uses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default)]
    pub device_id: u32,
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub mirror: bool,
}

fn default_frame_width() -> u32 {
    1280
}

fn default_frame_height() -> u32 {
    720
}

fn default_fps() -> u32 {
    30
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_id: 0,
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            fps: default_fps(),
            mirror: false,
        }
    }
}

impl CameraSettings {
    pub fn frame_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.frame_width as f64, self.frame_height as f64)
    }
}

/// Detector gates and pointer behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    pub threshold: ThresholdProfile,
    pub max_blobs: usize,
    /// Click trigger rise above the intensity baseline, as a fraction.
    pub sensitivity: f64,
    /// Fraction the signal may fall below the trigger level before release.
    pub hysteresis: f64,
    /// Weight of the newest cursor position in the exponential smoothing;
    /// values outside `(0, 1)` disable it.
    pub smoothing: f64,
    pub click_hold_ms: u64,
    /// Cursor dead zone in screen pixels.
    pub min_move_px: f64,
    /// Use the thresholds learned during calibration when available.
    pub prefer_learned: bool,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            threshold: ThresholdProfile::default(),
            max_blobs: 8,
            sensitivity: 0.65,
            hysteresis: 0.15,
            smoothing: 0.25,
            click_hold_ms: 120,
            min_move_px: 5.0,
            prefer_learned: true,
        }
    }
}

/// Everything the application persists between runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RefurboardConfig {
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub detection: DetectionSettings,
    #[serde(default)]
    pub calibration: Option<CalibrationProfile>,
}

impl RefurboardConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load `path`, or write and return the defaults if it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load_json(path);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let cfg = Self::default();
        cfg.write_json(path)?;
        info!("wrote default config to {}", path.display());
        Ok(cfg)
    }

    /// Mapping for the stored profile.
    pub fn build_mapping(&self) -> Result<HomographyMapping, MappingError> {
        HomographyMapping::try_create(self.calibration.as_ref())
    }

    /// Validate `profile` and make it the current calibration.
    ///
    /// The stored profile is left untouched when the new one does not yield
    /// a mapping. A missing camera orientation is filled in from the
    /// configured frame size.
    pub fn replace_calibration(
        &mut self,
        mut profile: CalibrationProfile,
    ) -> Result<HomographyMapping, MappingError> {
        let mapping = HomographyMapping::try_from_profile(&profile)?;
        if profile.reprojection_error.is_none() {
            profile.reprojection_error = Some(mapping.reprojection_error());
        }
        if profile.camera_orientation.is_none() {
            profile.camera_orientation = profile
                .corner(CornerName::TopLeft)
                .map(|tl| CameraOrientation::detect(tl.pixel, self.camera.frame_size()));
        }
        self.calibration = Some(profile);
        Ok(mapping)
    }

    pub fn clear_calibration(&mut self) {
        self.calibration = None;
    }

    /// Detector gates in effect: learned thresholds from the stored profile
    /// when present and preferred, the configured ones otherwise.
    pub fn effective_threshold(&self) -> ThresholdProfile {
        let learned = self
            .calibration
            .as_ref()
            .and_then(|p| p.learned)
            .filter(|_| self.detection.prefer_learned);
        match learned {
            Some(l) => l.to_threshold_profile(),
            None => self.detection.threshold,
        }
    }

    pub fn build_detector_params(&self) -> BlobDetectorParams {
        BlobDetectorParams {
            threshold: self.effective_threshold(),
            max_blobs: self.detection.max_blobs,
        }
    }

    /// Build a validated detector from this config.
    pub fn build_detector(&self) -> Result<BlobDetector, ConfigError> {
        Ok(BlobDetector::try_new(self.build_detector_params())?)
    }
}
