use crate::traits::Lerp;

/// Frame-stepped exponential smoothing toward a moving target.
///
/// Each call to [`Damping::step`] covers a fixed fraction of the remaining
/// distance. The step is not corrected for elapsed time, so a display with a
/// higher refresh rate converges faster in wall-clock terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Damping {
    factor: f64,
}

impl Damping {
    /// `factor` is clamped to `[0, 1]`; 0 never moves, 1 snaps to the target.
    pub fn new(factor: f64) -> Self {
        Self {
            factor: factor.clamp(0.0, 1.0),
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn step<T: Lerp>(&self, current: &T, target: &T) -> T {
        current.lerp(target, self.factor)
    }

    /// Remaining distance after `frames` steps toward a fixed target
    pub fn remaining_after(&self, distance: f64, frames: u32) -> f64 {
        distance * (1.0 - self.factor).powi(frames as i32)
    }
}
