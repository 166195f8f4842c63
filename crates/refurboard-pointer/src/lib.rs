//! Real-time pointer pipeline for camera-tracked whiteboard pens.
//!
//! A [`PointerTracker`] detects IR blobs in each frame, picks the pen tip,
//! projects it through the calibrated homography, clamps it to the screen
//! and drives a [`PointerSink`]. Recalibration swaps in a new
//! [`PointerPipeline`] without disturbing frames already in flight.
//!
//! The OS cursor backend is behind the `enigo` feature; without it (or when
//! the backend cannot start) [`default_sink`] falls back to [`NoopSink`].

mod click;
mod deadzone;
#[cfg(feature = "enigo")]
mod enigo_sink;
mod pipeline;
mod sink;
mod smoothing;
mod tracker;

pub use click::{ClickEvent, ClickState};
pub use deadzone::DeadzoneSink;
#[cfg(feature = "enigo")]
pub use enigo_sink::EnigoSink;
pub use pipeline::{
    ClickParams, PipelineParams, PointerPipeline, ProjectedPointerSample, SampleListener,
};
pub use sink::{
    default_sink, LoggingSink, NoopSink, PointerSink, RecordingSink, SinkError, SinkEvent,
};
pub use smoothing::Smoother;
pub use tracker::{run_frame_loop, FrameSource, LoopStats, PointerTracker};
