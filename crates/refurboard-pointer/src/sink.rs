use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info};
use refurboard_core::PixelCoordinate;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("pointer backend unavailable: {0}")]
    Unavailable(String),
    #[error("pointer backend failed: {0}")]
    Backend(String),
}

/// Platform cursor primitive. Implementations may block or fail; the
/// pipeline logs failures and keeps going.
pub trait PointerSink: Send + Sync {
    /// Move the cursor to a screen pixel.
    fn move_to(&self, target: PixelCoordinate) -> Result<(), SinkError>;

    /// Press the primary button at `at`.
    fn press(&self, _at: PixelCoordinate) -> Result<(), SinkError> {
        Ok(())
    }

    /// Release the primary button at `at`.
    fn release(&self, _at: PixelCoordinate) -> Result<(), SinkError> {
        Ok(())
    }

    /// The pen left the view. Stateful sinks drop per-stroke state here.
    fn pen_lost(&self) {}

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

impl<S: PointerSink + ?Sized> PointerSink for Arc<S> {
    fn move_to(&self, target: PixelCoordinate) -> Result<(), SinkError> {
        (**self).move_to(target)
    }

    fn press(&self, at: PixelCoordinate) -> Result<(), SinkError> {
        (**self).press(at)
    }

    fn release(&self, at: PixelCoordinate) -> Result<(), SinkError> {
        (**self).release(at)
    }

    fn pen_lost(&self) {
        (**self).pen_lost()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Does nothing. Always available.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl PointerSink for NoopSink {
    fn move_to(&self, _target: PixelCoordinate) -> Result<(), SinkError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Writes every call to the `log` facade at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingSink;

impl PointerSink for LoggingSink {
    fn move_to(&self, target: PixelCoordinate) -> Result<(), SinkError> {
        debug!("move to ({:.1}, {:.1})", target.x, target.y);
        Ok(())
    }

    fn press(&self, at: PixelCoordinate) -> Result<(), SinkError> {
        debug!("press at ({:.1}, {:.1})", at.x, at.y);
        Ok(())
    }

    fn release(&self, at: PixelCoordinate) -> Result<(), SinkError> {
        debug!("release at ({:.1}, {:.1})", at.x, at.y);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "logging"
    }
}

/// Cursor call recorded by [`RecordingSink`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SinkEvent {
    Move(PixelCoordinate),
    Press(PixelCoordinate),
    Release(PixelCoordinate),
}

/// Keeps every call in memory. Handy for dry runs and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: SinkEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl PointerSink for RecordingSink {
    fn move_to(&self, target: PixelCoordinate) -> Result<(), SinkError> {
        self.push(SinkEvent::Move(target));
        Ok(())
    }

    fn press(&self, at: PixelCoordinate) -> Result<(), SinkError> {
        self.push(SinkEvent::Press(at));
        Ok(())
    }

    fn release(&self, at: PixelCoordinate) -> Result<(), SinkError> {
        self.push(SinkEvent::Release(at));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Best sink for this host: the OS cursor when the `enigo` feature is on
/// and the backend starts, otherwise [`NoopSink`].
pub fn default_sink() -> Arc<dyn PointerSink> {
    #[cfg(feature = "enigo")]
    {
        match crate::enigo_sink::EnigoSink::spawn() {
            Ok(sink) => {
                info!("using {} pointer backend", sink.name());
                return Arc::new(sink);
            }
            Err(err) => log::warn!("{err}; falling back to the no-op pointer backend"),
        }
    }
    info!("using {} pointer backend", NoopSink.name());
    Arc::new(NoopSink)
}
