use refurboard_core::PixelCoordinate;

/// Exponential moving average over cursor positions:
/// `value = (1 - factor) * previous + factor * current`.
///
/// The first sample after construction or [`Smoother::reset`] passes through.
#[derive(Clone, Debug, PartialEq)]
pub struct Smoother {
    factor: f64,
    value: Option<PixelCoordinate>,
}

impl Smoother {
    /// `factor` is clamped into `[0, 1]`; `1` disables smoothing.
    pub fn new(factor: f64) -> Self {
        let factor = if factor.is_nan() {
            1.0
        } else {
            factor.clamp(0.0, 1.0)
        };
        Self {
            factor,
            value: None,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn update(&mut self, current: PixelCoordinate) -> PixelCoordinate {
        let next = match self.value {
            None => current,
            Some(prev) => PixelCoordinate::new(
                (1.0 - self.factor) * prev.x + self.factor * current.x,
                (1.0 - self.factor) * prev.y + self.factor * current.y,
            ),
        };
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> Option<PixelCoordinate> {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}
