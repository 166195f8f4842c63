use std::sync::{Mutex, PoisonError};

use refurboard_core::PixelCoordinate;

use crate::sink::{PointerSink, SinkError};

/// Skipped in-zone moves after which a small move is forwarded anyway, so the
/// cursor never locks up under jitter.
const FORCED_MOVE_AFTER_SKIPS: u32 = 2;

#[derive(Debug, Default)]
struct DeadzoneState {
    last_target: Option<PixelCoordinate>,
    skips: u32,
}

/// Drops cursor moves that stay within `min_move_px` of the last forwarded
/// target.
///
/// The first move always passes. A move inside the zone that still changes
/// the target is forwarded on the second consecutive skip. Press and release
/// always pass through.
#[derive(Debug)]
pub struct DeadzoneSink<S> {
    inner: S,
    min_move_px: f64,
    state: Mutex<DeadzoneState>,
}

impl<S: PointerSink> DeadzoneSink<S> {
    pub fn new(inner: S, min_move_px: f64) -> Self {
        Self {
            inner,
            min_move_px: min_move_px.max(0.0),
            state: Mutex::new(DeadzoneState::default()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Forget the skip counter. The last target is kept so a release still
    /// lands where the cursor is.
    pub fn reset_skips(&self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .skips = 0;
    }

    fn should_forward(&self, state: &mut DeadzoneState, target: PixelCoordinate) -> bool {
        let Some(last) = state.last_target else {
            return true;
        };
        if last.distance(&target) > self.min_move_px {
            return true;
        }
        if target != last {
            state.skips += 1;
            return state.skips >= FORCED_MOVE_AFTER_SKIPS;
        }
        false
    }
}

impl<S: PointerSink> PointerSink for DeadzoneSink<S> {
    fn move_to(&self, target: PixelCoordinate) -> Result<(), SinkError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.should_forward(&mut state, target) {
            return Ok(());
        }
        self.inner.move_to(target)?;
        state.last_target = Some(target);
        state.skips = 0;
        Ok(())
    }

    fn press(&self, at: PixelCoordinate) -> Result<(), SinkError> {
        self.inner.press(at)
    }

    fn release(&self, at: PixelCoordinate) -> Result<(), SinkError> {
        self.inner.release(at)
    }

    fn pen_lost(&self) {
        self.reset_skips();
        self.inner.pen_lost();
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
