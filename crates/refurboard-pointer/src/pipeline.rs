use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};
use refurboard_calib::{HomographyMapping, RefurboardConfig};
use refurboard_core::{NormalizedCoordinate, PixelCoordinate};
use refurboard_detect::{BlobSelector, ClickTrigger, IrBlob, IrBlobFrame, SelectionWeights};
use serde::{Deserialize, Serialize};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::click::{ClickEvent, ClickState};
use crate::sink::PointerSink;
use crate::smoothing::Smoother;

/// One successfully projected frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPointerSample {
    /// Screen pixel, clamped to the mapping's screen bounds.
    pub screen_pixel: PixelCoordinate,
    pub screen_normalized: NormalizedCoordinate,
    pub source_blob: IrBlob,
    pub timestamp: f64,
}

/// Callback fired for every emitted sample.
pub type SampleListener = Arc<dyn Fn(&ProjectedPointerSample) + Send + Sync>;

/// Click detection on the selected blob's intensity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClickParams {
    pub sensitivity: f64,
    pub hysteresis: f64,
    pub hold_ms: u64,
}

impl Default for ClickParams {
    fn default() -> Self {
        Self {
            sensitivity: 0.65,
            hysteresis: 0.15,
            hold_ms: 120,
        }
    }
}

/// Optional per-frame behaviour on top of select/project/clamp/normalize.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    #[serde(default)]
    pub selection: SelectionWeights,
    /// Weight of the newest position in the cursor smoothing, in `(0, 1)`.
    #[serde(default)]
    pub smoothing: Option<f64>,
    #[serde(default)]
    pub click: Option<ClickParams>,
}

impl PipelineParams {
    /// Pointer behaviour from the persisted detection settings. Smoothing
    /// factors outside `(0, 1)` turn smoothing off.
    pub fn from_config(cfg: &RefurboardConfig) -> Self {
        let d = &cfg.detection;
        Self {
            selection: SelectionWeights::default(),
            smoothing: Some(d.smoothing).filter(|s| *s > 0.0 && *s < 1.0),
            click: Some(ClickParams {
                sensitivity: d.sensitivity,
                hysteresis: d.hysteresis,
                hold_ms: d.click_hold_ms,
            }),
        }
    }
}

#[derive(Debug)]
struct ClickTracking {
    trigger: ClickTrigger,
    state: ClickState,
}

#[derive(Debug, Default)]
struct PipelineState {
    smoother: Option<Smoother>,
    click: Option<ClickTracking>,
    last_target: Option<PixelCoordinate>,
}

/// Per-frame orchestration: select a blob, project it through the mapping,
/// clamp and normalize, drive the sink and notify listeners.
///
/// The mapping is fixed for the pipeline's lifetime; recalibrating means
/// building a new pipeline.
pub struct PointerPipeline {
    mapping: HomographyMapping,
    selector: BlobSelector,
    sink: Arc<dyn PointerSink>,
    listeners: Vec<SampleListener>,
    state: Mutex<PipelineState>,
}

impl fmt::Debug for PointerPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerPipeline")
            .field("mapping", &self.mapping)
            .field("selector", &self.selector)
            .field("sink", &self.sink.name())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PointerPipeline {
    pub fn new(mapping: HomographyMapping, sink: Arc<dyn PointerSink>) -> Self {
        Self::with_params(mapping, sink, &PipelineParams::default())
    }

    pub fn with_params(
        mapping: HomographyMapping,
        sink: Arc<dyn PointerSink>,
        params: &PipelineParams,
    ) -> Self {
        let state = PipelineState {
            smoother: params.smoothing.map(Smoother::new),
            click: params.click.as_ref().map(|c| ClickTracking {
                trigger: ClickTrigger::new(c.sensitivity, c.hysteresis),
                state: ClickState::new(c.hold_ms),
            }),
            last_target: None,
        };
        Self {
            mapping,
            selector: BlobSelector::new(params.selection),
            sink,
            listeners: Vec::new(),
            state: Mutex::new(state),
        }
    }

    /// Register a sample listener.
    pub fn subscribe(&mut self, listener: SampleListener) {
        self.listeners.push(listener);
    }

    pub fn mapping(&self) -> &HomographyMapping {
        &self.mapping
    }

    /// Run one frame. `None` means nothing to report this frame: no blob, or
    /// the blob projects onto the horizon line.
    ///
    /// Sink failures are logged and do not affect the returned sample.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self, frame), fields(blobs = frame.blobs.len()))
    )]
    pub fn process_frame(&self, frame: &IrBlobFrame) -> Option<ProjectedPointerSample> {
        let Some(blob) = self.selector.select(&frame.blobs).copied() else {
            self.pen_lost(frame.timestamp);
            return None;
        };

        let Some(projected) = self.mapping.try_project(blob.pixel) else {
            debug!(
                "blob at ({:.1}, {:.1}) has no screen projection",
                blob.pixel.x, blob.pixel.y
            );
            self.release_click(frame.timestamp);
            return None;
        };

        let bounds = self.mapping.screen_bounds();
        let (w, h) = (bounds.width_f64(), bounds.height_f64());
        let clamped = projected.clamp_to(w, h);

        let (screen_pixel, click) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let target = match state.smoother.as_mut() {
                Some(s) => s.update(clamped),
                None => clamped,
            };
            state.last_target = Some(target);
            let click = state.click.as_mut().and_then(|c| {
                let pressed = c.trigger.evaluate(blob.intensity);
                c.state.update(pressed, frame.timestamp)
            });
            (target, click)
        };
        let screen_normalized = screen_pixel.normalize_by(w, h);

        if let Err(err) = self.sink.move_to(screen_pixel) {
            warn!("{} sink rejected move: {err}", self.sink.name());
        }
        if let Some(event) = click {
            self.emit_click(event, screen_pixel);
        }

        let sample = ProjectedPointerSample {
            screen_pixel,
            screen_normalized,
            source_blob: blob,
            timestamp: frame.timestamp,
        };
        for listener in &self.listeners {
            listener(&sample);
        }
        Some(sample)
    }

    /// No pen this frame: restart smoothing, tell the sink, and let go of a
    /// held button.
    fn pen_lost(&self, timestamp: f64) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(s) = state.smoother.as_mut() {
                s.reset();
            }
        }
        self.sink.pen_lost();
        self.release_click(timestamp);
    }

    /// Release a held button at the last target, if one is held.
    fn release_click(&self, timestamp: f64) {
        let (release_at, event) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let last = state.last_target;
            let event = state
                .click
                .as_mut()
                .and_then(|c| c.state.update(false, timestamp));
            (last, event)
        };
        if let (Some(at), Some(event)) = (release_at, event) {
            self.emit_click(event, at);
        }
    }

    fn emit_click(&self, event: ClickEvent, at: PixelCoordinate) {
        let res = match event {
            ClickEvent::Press => self.sink.press(at),
            ClickEvent::Release => self.sink.release(at),
        };
        if let Err(err) = res {
            warn!("{} sink rejected {event:?}: {err}", self.sink.name());
        }
    }
}
