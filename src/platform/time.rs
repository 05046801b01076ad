//! Fixed timestep accumulator

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Converts variable frame times into a whole number of fixed steps
#[derive(Debug, Clone)]
pub struct FixedStepper {
    pub step: f32,
    pub max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStepper {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Add a frame's elapsed time and return how many steps to run
    ///
    /// Long frames are capped, and leftover time beyond `max_substeps` is
    /// dropped so a slow frame cannot snowball into the next one.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        // NaN would poison the accumulator for good
        let frame_dt = if frame_dt.is_finite() { frame_dt } else { 0.0 };
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        substeps
    }

    /// Fraction of a step left over (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut stepper = FixedStepper::new(0.01, 8);
        assert_eq!(stepper.advance(0.004), 0);
        assert_eq!(stepper.advance(0.004), 0);
        assert_eq!(stepper.advance(0.004), 1);
        assert!((stepper.alpha() - 0.2).abs() < 1e-3);
    }

    #[test]
    fn test_caps_substeps() {
        let mut stepper = FixedStepper::new(0.01, 4);
        assert_eq!(stepper.advance(0.09), 4);
        // Backlog was dropped, not carried forward
        assert!(stepper.advance(0.0) <= 1);
    }

    #[test]
    fn test_ignores_negative_and_huge_frames() {
        let mut stepper = FixedStepper::default();
        assert_eq!(stepper.advance(-1.0), 0);
        assert_eq!(stepper.advance(10.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_non_finite_frame_is_dropped() {
        let mut stepper = FixedStepper::new(0.01, 8);
        assert_eq!(stepper.advance(f32::NAN), 0);
        assert_eq!(stepper.advance(f32::INFINITY), 0);
        assert!(stepper.alpha().is_finite());

        // Later frames still step normally
        assert_eq!(stepper.advance(0.025), 2);
        assert!((stepper.alpha() - 0.5).abs() < 1e-3);
    }
}
