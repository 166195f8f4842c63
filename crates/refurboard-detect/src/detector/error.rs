use refurboard_core::PixelFormat;

/// Errors returned by the blob detector.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    #[error("unsupported pixel format {format} (only BGRA8888 frames can be scanned)")]
    UnsupportedFormat { format: PixelFormat },
    #[error("row stride {stride} is smaller than one row of {width} BGRA pixels")]
    InvalidStride { stride: usize, width: usize },
    #[error("invalid threshold profile: {reason}")]
    InvalidThreshold { reason: String },
}
