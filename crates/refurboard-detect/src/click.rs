use serde::{Deserialize, Serialize};

/// Hysteresis trigger on blob intensity, used to tell a pressed pen tip
/// (LED switched on hard) from a hovering one.
///
/// The baseline tracks the signal slowly (`0.98 * baseline + 0.02 * signal`),
/// so the trigger adapts to ambient IR. The state latches on at
/// `baseline * (1 + sensitivity)` and only releases once the signal drops
/// below that level scaled by `1 - hysteresis`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClickTrigger {
    pub sensitivity: f64,
    pub hysteresis: f64,
    baseline: f64,
    active: bool,
}

impl ClickTrigger {
    pub fn new(sensitivity: f64, hysteresis: f64) -> Self {
        Self {
            sensitivity,
            hysteresis,
            baseline: 0.0,
            active: false,
        }
    }

    /// Feed one intensity sample and return the trigger state.
    pub fn evaluate(&mut self, signal: f64) -> bool {
        if self.baseline == 0.0 {
            self.baseline = signal;
        } else {
            self.baseline = 0.98 * self.baseline + 0.02 * signal;
        }

        let high = self.baseline + self.baseline * self.sensitivity;
        let low = high * (1.0 - self.hysteresis);

        self.active = if self.active {
            signal >= low
        } else {
            signal >= high
        };
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn reset(&mut self) {
        self.baseline = 0.0;
        self.active = false;
    }
}
