/// Button transition requested by [`ClickState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickEvent {
    Press,
    Release,
}

/// Turns a per-frame pressed/not-pressed signal into press and release
/// events.
///
/// Presses on the rising edge and releases on the falling edge, or once the
/// button has been held for `hold_ms` (measured on frame timestamps, in
/// seconds). After a timed release the next pressed frame presses again.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickState {
    hold_ms: u64,
    pressed_at: Option<f64>,
}

impl ClickState {
    pub fn new(hold_ms: u64) -> Self {
        Self {
            hold_ms,
            pressed_at: None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    pub fn update(&mut self, pressed: bool, timestamp: f64) -> Option<ClickEvent> {
        match (pressed, self.pressed_at) {
            (true, None) => {
                self.pressed_at = Some(timestamp);
                Some(ClickEvent::Press)
            }
            (false, Some(_)) => {
                self.pressed_at = None;
                Some(ClickEvent::Release)
            }
            (true, Some(start)) if (timestamp - start) * 1000.0 >= self.hold_ms as f64 => {
                self.pressed_at = None;
                Some(ClickEvent::Release)
            }
            _ => None,
        }
    }
}
