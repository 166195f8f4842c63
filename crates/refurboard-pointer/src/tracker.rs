use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::{info, warn};
use refurboard_calib::{
    CalibrationProfile, ConfigError, HomographyMapping, MappingError, RefurboardConfig,
};
use refurboard_core::{FrameView, OwnedFrame};
use refurboard_detect::{BlobDetector, DetectError, IrBlobFrame};

use crate::deadzone::DeadzoneSink;
use crate::pipeline::{PipelineParams, PointerPipeline, ProjectedPointerSample, SampleListener};
use crate::sink::PointerSink;

/// Detector plus the current calibrated pipeline.
///
/// The pipeline is held as an immutable snapshot behind an `Arc`. Installing
/// a new calibration builds a fresh pipeline and swaps the pointer, so a
/// frame in flight finishes on the mapping it started with.
pub struct PointerTracker {
    detector: BlobDetector,
    sink: Arc<dyn PointerSink>,
    params: PipelineParams,
    listeners: Vec<SampleListener>,
    pipeline: RwLock<Option<Arc<PointerPipeline>>>,
}

impl fmt::Debug for PointerTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerTracker")
            .field("detector", &self.detector)
            .field("sink", &self.sink.name())
            .field("params", &self.params)
            .field("calibrated", &self.is_calibrated())
            .finish()
    }
}

impl PointerTracker {
    pub fn new(detector: BlobDetector, sink: Arc<dyn PointerSink>, params: PipelineParams) -> Self {
        Self {
            detector,
            sink,
            params,
            listeners: Vec::new(),
            pipeline: RwLock::new(None),
        }
    }

    /// Tracker wired from persisted settings: detector gates, pointer
    /// behaviour, and `sink` behind a dead zone of `min_move_px`. A stored
    /// calibration is installed right away and must be valid.
    pub fn from_config(
        cfg: &RefurboardConfig,
        sink: Arc<dyn PointerSink>,
    ) -> Result<Self, ConfigError> {
        let detector = cfg.build_detector()?;
        let sink: Arc<dyn PointerSink> = if cfg.detection.min_move_px > 0.0 {
            Arc::new(DeadzoneSink::new(sink, cfg.detection.min_move_px))
        } else {
            sink
        };
        let tracker = Self::new(detector, sink, PipelineParams::from_config(cfg));
        if let Some(profile) = &cfg.calibration {
            tracker.install_profile(profile)?;
        }
        Ok(tracker)
    }

    /// Register a listener on every pipeline built from now on.
    pub fn subscribe(&mut self, listener: SampleListener) {
        self.listeners.push(listener);
    }

    pub fn detector(&self) -> &BlobDetector {
        &self.detector
    }

    /// Validate `profile` and switch to a pipeline built from it. On error
    /// the current pipeline stays in place.
    pub fn install_profile(&self, profile: &CalibrationProfile) -> Result<(), MappingError> {
        let mapping = HomographyMapping::try_from_profile(profile)?;
        self.install_mapping(mapping);
        Ok(())
    }

    pub fn install_mapping(&self, mapping: HomographyMapping) {
        let mut pipeline = PointerPipeline::with_params(mapping, Arc::clone(&self.sink), &self.params);
        for l in &self.listeners {
            pipeline.subscribe(Arc::clone(l));
        }
        let next = Arc::new(pipeline);
        *self.pipeline.write().unwrap_or_else(PoisonError::into_inner) = Some(next);
        info!("pointer pipeline installed");
    }

    /// Drop the pipeline; frames are detected but not projected until the
    /// next successful install.
    pub fn clear_calibration(&self) {
        *self.pipeline.write().unwrap_or_else(PoisonError::into_inner) = None;
        info!("pointer pipeline cleared");
    }

    pub fn is_calibrated(&self) -> bool {
        self.current_pipeline().is_some()
    }

    /// Snapshot of the pipeline in use right now.
    pub fn current_pipeline(&self) -> Option<Arc<PointerPipeline>> {
        self.pipeline
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Detect blobs in `frame` and run them through the current pipeline.
    ///
    /// Only a frame the detector cannot scan (wrong format or stride) is an
    /// error; every per-frame miss is `Ok(None)`.
    pub fn process_frame(
        &self,
        frame: &FrameView<'_>,
    ) -> Result<Option<ProjectedPointerSample>, DetectError> {
        let blobs = self.detector.detect_frame(frame)?;
        Ok(self.process_blobs(&blobs))
    }

    /// Run already detected blobs through the current pipeline.
    pub fn process_blobs(&self, blobs: &IrBlobFrame) -> Option<ProjectedPointerSample> {
        let pipeline = self.current_pipeline()?;
        pipeline.process_frame(blobs)
    }
}

/// Producer of camera frames. `None` ends the stream.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<OwnedFrame>;
}

impl<I> FrameSource for I
where
    I: Iterator<Item = OwnedFrame>,
{
    fn next_frame(&mut self) -> Option<OwnedFrame> {
        self.next()
    }
}

/// Counters from one [`run_frame_loop`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: usize,
    pub samples: usize,
}

/// Pull frames from `source` and process each to completion until the
/// source runs dry or `stop` is raised.
///
/// A frame the detector cannot scan ends the loop with an error.
pub fn run_frame_loop<S: FrameSource + ?Sized>(
    tracker: &PointerTracker,
    source: &mut S,
    stop: &AtomicBool,
) -> Result<LoopStats, DetectError> {
    let mut stats = LoopStats::default();
    while !stop.load(Ordering::Acquire) {
        let Some(frame) = source.next_frame() else {
            break;
        };
        stats.frames += 1;
        match tracker.process_frame(&frame.view()) {
            Ok(Some(_)) => stats.samples += 1,
            Ok(None) => {}
            Err(err) => {
                warn!("frame loop stopped: {err}");
                return Err(err);
            }
        }
    }
    info!(
        "frame loop finished after {} frame(s), {} sample(s)",
        stats.frames, stats.samples
    );
    Ok(stats)
}
