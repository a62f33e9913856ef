//! Per-axis signal filter: median-of-3 despike, attack/release EMA, soft deadzone
//!
//! Called exactly once per frame per axis, in sample order. The ring
//! buffer and smoothed value carry across frames, so calls made out of
//! frame order produce garbage.

use crate::consts::MIN_TAU;
use crate::tuning::FilterTuning;
use crate::{median3, soft_deadzone};

/// Denoising filter for one angular-rate channel
#[derive(Debug, Clone)]
pub struct AxisFilter {
    tuning: FilterTuning,
    smoothed: f32,
    hist: [f32; 3],
    hist_idx: usize,
    filled: bool,
}

impl AxisFilter {
    pub fn new(tuning: FilterTuning) -> Self {
        Self {
            tuning,
            smoothed: 0.0,
            hist: [0.0; 3],
            hist_idx: 0,
            filled: false,
        }
    }

    /// Restore session-start state
    pub fn reset(&mut self) {
        self.smoothed = 0.0;
        self.hist = [0.0; 3];
        self.hist_idx = 0;
        self.filled = false;
    }

    /// The smoothed value before the deadzone is applied
    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    /// Advance the filter by one frame and return the denoised rate
    pub fn step(&mut self, raw: f32, dt: f32) -> f32 {
        // median(3); pass raw through until the ring fills
        self.hist[self.hist_idx] = raw;
        self.hist_idx = (self.hist_idx + 1) % 3;
        if self.hist_idx == 0 {
            self.filled = true;
        }
        let input = if self.filled {
            median3(self.hist[0], self.hist[1], self.hist[2])
        } else {
            raw
        };

        // attack/release EMA: respond fast to growth, slow to decay
        let dt = dt.max(0.0);
        let a_attack = 1.0 - (-dt / self.tuning.tau_attack.max(MIN_TAU)).exp();
        let a_release = 1.0 - (-dt / self.tuning.tau_release.max(MIN_TAU)).exp();
        let alpha = if input.abs() > self.smoothed.abs() {
            a_attack
        } else {
            a_release
        };
        self.smoothed += (input - self.smoothed) * alpha;

        soft_deadzone(self.smoothed, self.tuning.deadzone)
    }
}
