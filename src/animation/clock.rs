use crate::foundation::error::{MathvizError, MathvizResult};

/// Monotonic progress counter of one animation variant.
///
/// The value is always derived as `start + steps_taken * step`, never accumulated,
/// so fractional steps land on the same values on every run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clock {
    start: f64,
    step: f64,
    end: f64,
    steps_taken: u32,
    frame_count: u32,
}

impl Clock {
    /// Clock running from `start` toward `end` in increments of `step`.
    pub fn new(start: f64, step: f64, end: f64) -> MathvizResult<Self> {
        if !(start.is_finite() && step.is_finite() && end.is_finite()) {
            return Err(MathvizError::validation("clock bounds must be finite"));
        }
        if step <= 0.0 {
            return Err(MathvizError::validation("clock step must be > 0"));
        }
        if end < start {
            return Err(MathvizError::validation("clock end must be >= start"));
        }

        // The epsilon absorbs representation error in spans like 30 / 0.2.
        let frame_count = ((end - start) / step - 1e-9).ceil().max(0.0) as u32;
        Ok(Self {
            start,
            step,
            end,
            steps_taken: 0,
            frame_count,
        })
    }

    /// Integer clock `0, 1, .., end`.
    pub fn counter(end: u32) -> Self {
        Self {
            start: 0.0,
            step: 1.0,
            end: f64::from(end),
            steps_taken: 0,
            frame_count: end,
        }
    }

    /// Current progress value.
    pub fn value(&self) -> f64 {
        self.start + f64::from(self.steps_taken) * self.step
    }

    /// Starting value.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Increment per update.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Terminal bound.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Number of updates applied since the last reset.
    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    /// Number of updates needed to reach `end`.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Whether the terminal bound has been reached.
    pub fn is_finished(&self) -> bool {
        self.steps_taken >= self.frame_count
    }

    /// Move one step forward unless already finished.
    pub fn advance(&mut self) {
        if !self.is_finished() {
            self.steps_taken += 1;
        }
    }

    /// Return to the starting value.
    pub fn reset(&mut self) {
        self.steps_taken = 0;
    }

    /// Jump to `steps` updates after start, clamped to the frame count.
    pub fn seek(&mut self, steps: u32) {
        self.steps_taken = steps.min(self.frame_count);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
