use serde::{Deserialize, Serialize};

use crate::blob::IrBlob;

/// Linear weights of the pen-tip score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionWeights {
    pub area: f64,
    pub intensity: f64,
    pub confidence: f64,
}

impl Default for SelectionWeights {
    fn default() -> Self {
        Self {
            area: 0.7,
            intensity: 0.2,
            confidence: 0.1,
        }
    }
}

/// Picks the single most pen-like blob of a frame.
///
/// Area carries most of the weight, so a large reflection beats a tiny but
/// brighter sparkle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlobSelector {
    weights: SelectionWeights,
}

impl BlobSelector {
    pub fn new(weights: SelectionWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &SelectionWeights {
        &self.weights
    }

    /// `area*w_a + intensity*w_i + confidence*w_c`, with area and intensity
    /// floored at 0 and confidence clamped into `[0, 1]`.
    pub fn score(&self, blob: &IrBlob) -> f64 {
        let area = blob.area.max(0.0);
        let intensity = blob.intensity.max(0.0);
        let confidence = blob.confidence.clamp(0.0, 1.0);
        let confidence = if confidence.is_nan() { 0.0 } else { confidence };
        area * self.weights.area
            + intensity * self.weights.intensity
            + confidence * self.weights.confidence
    }

    /// Highest-scoring blob; the first one wins ties. `None` for an empty list.
    pub fn select<'a>(&self, blobs: &'a [IrBlob]) -> Option<&'a IrBlob> {
        let mut best: Option<(&IrBlob, f64)> = None;
        for blob in blobs {
            let score = self.score(blob);
            match best {
                Some((_, best_score)) if !(score > best_score) => {}
                _ => best = Some((blob, score)),
            }
        }
        best.map(|(blob, _)| blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refurboard_core::PixelCoordinate;

    fn blob(x: f64, y: f64, area: f64, intensity: f64, confidence: f64) -> IrBlob {
        IrBlob {
            pixel: PixelCoordinate::new(x, y),
            area,
            intensity,
            confidence,
        }
    }

    #[test]
    fn area_outweighs_slightly_higher_intensity() {
        let blobs = [
            blob(10.0, 10.0, 50.0, 0.9, 1.0),
            blob(500.0, 500.0, 10.0, 0.95, 1.0),
        ];
        let picked = BlobSelector::default().select(&blobs).unwrap();
        assert_eq!(picked.pixel, PixelCoordinate::new(10.0, 10.0));
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert!(BlobSelector::default().select(&[]).is_none());
    }

    #[test]
    fn ties_resolve_to_first() {
        let blobs = [blob(1.0, 1.0, 4.0, 0.5, 0.8), blob(2.0, 2.0, 4.0, 0.5, 0.8)];
        let picked = BlobSelector::default().select(&blobs).unwrap();
        assert_eq!(picked.pixel.x, 1.0);
    }

    #[test]
    fn selection_is_deterministic() {
        let blobs = [
            blob(1.0, 1.0, 3.0, 0.2, 0.1),
            blob(2.0, 2.0, 9.0, 0.7, 0.9),
            blob(3.0, 3.0, 9.0, 0.7, 0.9),
        ];
        let selector = BlobSelector::default();
        let first = *selector.select(&blobs).unwrap();
        for _ in 0..10 {
            assert_eq!(*selector.select(&blobs).unwrap(), first);
        }
        assert_eq!(first.pixel.x, 2.0);
    }

    #[test]
    fn negative_and_out_of_range_inputs_are_sanitized() {
        let selector = BlobSelector::default();
        let s = selector.score(&blob(0.0, 0.0, -10.0, -1.0, 4.0));
        assert!((s - 0.1).abs() < 1e-12);
        let nan = selector.score(&blob(0.0, 0.0, f64::NAN, 0.5, f64::NAN));
        assert!((nan - 0.1).abs() < 1e-12);
    }
}
