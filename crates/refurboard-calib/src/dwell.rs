//! Hands-free corner capture: hold the pen still on a target until the point
//! locks, then learn detection thresholds from the locked samples.

use log::{debug, info};
use refurboard_core::PixelCoordinate;
use refurboard_detect::{IrBlob, ThresholdProfile};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DwellParams {
    /// Consecutive settled frames needed to lock a point.
    pub dwell_frames: usize,
    /// A hit within this distance of the anchor counts as settled.
    pub settle_radius_px: f64,
    /// Candidates closer than this to an already collected point are ignored.
    pub min_separation_px: f64,
    /// Candidates dimmer than this are ignored. `0` disables the gate.
    pub min_intensity: f64,
}

impl Default for DwellParams {
    fn default() -> Self {
        Self {
            dwell_frames: 7,
            settle_radius_px: 6.0,
            min_separation_px: 40.0,
            min_intensity: 0.0,
        }
    }
}

/// A locked calibration point with the blob statistics averaged over the
/// dwell window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectedPoint {
    pub pixel: PixelCoordinate,
    pub intensity: f64,
    pub area: f64,
}

/// Per-frame dwell tracker. Feed it the detector output for each frame until
/// it returns a point.
#[derive(Clone, Debug)]
pub struct DwellCollector {
    params: DwellParams,
    existing: Vec<PixelCoordinate>,
    anchor: Option<PixelCoordinate>,
    intensities: Vec<f64>,
    areas: Vec<f64>,
}

impl DwellCollector {
    pub fn new(params: DwellParams) -> Self {
        Self {
            params,
            existing: Vec::new(),
            anchor: None,
            intensities: Vec::new(),
            areas: Vec::new(),
        }
    }

    /// Points already collected in this run; nearby candidates are skipped.
    pub fn with_existing(mut self, existing: &[PixelCoordinate]) -> Self {
        self.existing = existing.to_vec();
        self
    }

    pub fn params(&self) -> &DwellParams {
        &self.params
    }

    /// Frames accumulated toward the current lock.
    pub fn progress(&self) -> usize {
        self.intensities.len()
    }

    /// Consume one frame's blobs (brightest first, as the detector emits
    /// them). Returns the locked point once the dwell completes.
    pub fn feed(&mut self, blobs: &[IrBlob]) -> Option<CollectedPoint> {
        let Some(best) = blobs.iter().find(|b| self.accepts(b)) else {
            self.restart(None);
            return None;
        };

        match self.anchor {
            Some(anchor) if anchor.distance(&best.pixel) <= self.params.settle_radius_px => {
                let nudged = PixelCoordinate::new(
                    anchor.x + (best.pixel.x - anchor.x) * 0.5,
                    anchor.y + (best.pixel.y - anchor.y) * 0.5,
                );
                self.anchor = Some(nudged);
                self.intensities.push(best.intensity);
                self.areas.push(best.area);
            }
            _ => self.restart(Some(best)),
        }

        debug!(
            "dwell {}/{} at {:?}",
            self.progress(),
            self.params.dwell_frames,
            self.anchor
        );

        if self.progress() < self.params.dwell_frames.max(1) {
            return None;
        }
        let pixel = self.anchor?;
        let point = CollectedPoint {
            pixel,
            intensity: mean(&self.intensities),
            area: mean(&self.areas),
        };
        info!(
            "point locked at ({:.1}, {:.1}), intensity={:.3}, area={:.1}",
            pixel.x, pixel.y, point.intensity, point.area
        );
        self.existing.push(pixel);
        self.restart(None);
        Some(point)
    }

    fn accepts(&self, blob: &IrBlob) -> bool {
        if self.params.min_intensity > 0.0 && blob.intensity < self.params.min_intensity {
            return false;
        }
        !self
            .existing
            .iter()
            .any(|p| p.distance(&blob.pixel) < self.params.min_separation_px)
    }

    fn restart(&mut self, seed: Option<&IrBlob>) {
        self.intensities.clear();
        self.areas.clear();
        self.anchor = seed.map(|b| b.pixel);
        if let Some(b) = seed {
            self.intensities.push(b.intensity);
            self.areas.push(b.area);
        }
    }
}

/// Intensity and area windows learned from the blobs seen while
/// calibrating.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearnedThresholds {
    pub intensity_min: f64,
    pub intensity_max: f64,
    pub area_min: f64,
    pub area_max: f64,
}

impl LearnedThresholds {
    /// `mean - 2.5σ .. mean + 3σ` for both statistics, floored at one luma
    /// step and 3 px². A lone sample assumes σ of 30% (intensity) and 50%
    /// (area) of its value. Returns `None` for an empty set.
    pub fn from_points(points: &[CollectedPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let intensities: Vec<f64> = points.iter().map(|p| p.intensity).collect();
        let areas: Vec<f64> = points.iter().map(|p| p.area).collect();

        let (i_mean, i_std) = mean_std(&intensities, 0.3);
        let (a_mean, a_std) = mean_std(&areas, 0.5);

        Some(Self {
            intensity_min: (i_mean - 2.5 * i_std).max(1.0 / 255.0),
            intensity_max: i_mean + 3.0 * i_std,
            area_min: (a_mean - 2.5 * a_std).max(3.0),
            area_max: a_mean + 3.0 * a_std,
        })
    }

    /// Detector gates derived from the learned windows. The intensity gate
    /// is the lower bound, clamped into `[0, 1]`.
    pub fn to_threshold_profile(&self) -> ThresholdProfile {
        ThresholdProfile {
            intensity: self.intensity_min.clamp(0.0, 1.0),
            min_area: self.area_min,
            max_area: self.area_max.max(self.area_min),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population mean and standard deviation; a single value gets
/// `single_ratio * mean` as its spread.
fn mean_std(values: &[f64], single_ratio: f64) -> (f64, f64) {
    let m = mean(values);
    if values.len() < 2 {
        return (m, m * single_ratio);
    }
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    (m, var.sqrt())
}
