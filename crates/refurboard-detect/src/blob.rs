use refurboard_core::PixelCoordinate;
use serde::{Deserialize, Serialize};

/// One IR-bright candidate in a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrBlob {
    /// Camera-pixel position of the sample.
    pub pixel: PixelCoordinate,
    /// Covered area in square pixels, `>= 0`.
    pub area: f64,
    /// Mean brightness in `[0, 1]`.
    pub intensity: f64,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f64,
}

/// All blobs reported for one captured frame, strongest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IrBlobFrame {
    pub timestamp: f64,
    pub blobs: Vec<IrBlob>,
}

impl IrBlobFrame {
    pub fn new(timestamp: f64, blobs: Vec<IrBlob>) -> Self {
        Self { timestamp, blobs }
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}
