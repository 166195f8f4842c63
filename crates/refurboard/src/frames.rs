use std::path::Path;

use crate::core::{FrameError, OwnedFrame};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the image helpers.
#[derive(thiserror::Error, Debug)]
pub enum ImageFrameError {
    #[error(transparent)]
    Image(#[from] ::image::ImageError),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Repack any `image` buffer as a packed BGRA8888 frame.
pub fn bgra_frame(img: &::image::DynamicImage, timestamp: f64) -> Result<OwnedFrame, FrameError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut data = rgba.into_raw();
    for px in data.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    OwnedFrame::from_bgra(width as usize, height as usize, data, timestamp)
}

/// Decode an image file into a BGRA8888 frame with timestamp 0.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(path)))]
pub fn load_bgra_frame(path: impl AsRef<Path>) -> Result<OwnedFrame, ImageFrameError> {
    let img = ::image::open(path)?;
    Ok(bgra_frame(&img, 0.0)?)
}
