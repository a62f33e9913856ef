//! Debounced, peak-tracking, sign-aware flick detector
//!
//! Classifies a smoothed rate trace into signed discrete events. Arming
//! requires a debounced rising edge above the start rate; an armed
//! candidate resolves through one of three competing exits: timeout
//! (rejected), dropping back below the end rate, or reversing sign while
//! still above the end rate. The machine cycles between `Idle` and
//! `Armed` for the whole session; there is no terminal state.

use crate::consts::{
    DEBOUNCE_CAP, DEBOUNCE_N, DETECTOR_MAX_DT, MIN_ARMED_SECS, MIN_SUCCESS_COOLDOWN,
    REJECT_COOLDOWN,
};
use crate::tuning::DetectorTuning;

/// Detector phase. `Armed` is tracking a candidate gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    Idle,
    Armed,
}

/// Per-axis flick state machine
#[derive(Debug, Clone)]
pub struct FlickDetector {
    tuning: DetectorTuning,
    state: DetectorState,
    timer: f32,
    peak_abs_rate: f32,
    peak_sign: f32,
    cooldown: f32,
    pos_count: u32,
    neg_count: u32,
    prev_deb_pos: bool,
    prev_deb_neg: bool,
}

impl FlickDetector {
    pub fn new(tuning: DetectorTuning) -> Self {
        Self {
            tuning,
            state: DetectorState::Idle,
            timer: 0.0,
            peak_abs_rate: 0.0,
            peak_sign: 1.0,
            cooldown: 0.0,
            pos_count: 0,
            neg_count: 0,
            prev_deb_pos: false,
            prev_deb_neg: false,
        }
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == DetectorState::Armed
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown
    }

    /// The configured cooldown after an accepted flick
    pub fn cooldown(&self) -> f32 {
        self.tuning.cooldown
    }

    /// Restore session-start state
    pub fn reset(&mut self) {
        let tuning = self.tuning;
        *self = Self::new(tuning);
    }

    /// Forget partial debounce progress. Called by the cross-talk gate when
    /// the opposite axis dominates an idle detector.
    pub(crate) fn clear_debounce(&mut self) {
        self.pos_count = 0;
        self.neg_count = 0;
    }

    /// Advance one frame. Returns -1, 0, or +1.
    pub fn update(&mut self, rate: f32, dt: f32) -> i32 {
        // Detector timing only; the filters see the host's real dt.
        let dt = dt.clamp(0.0, DETECTOR_MAX_DT);

        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
            return 0;
        }

        let abs_rate = rate.abs();
        let sign = if rate >= 0.0 { 1.0 } else { -1.0 };

        self.pos_count = if rate > self.tuning.start_rate_rad {
            (self.pos_count + 1).min(DEBOUNCE_CAP)
        } else {
            0
        };
        self.neg_count = if rate < -self.tuning.start_rate_rad {
            (self.neg_count + 1).min(DEBOUNCE_CAP)
        } else {
            0
        };

        let deb_pos = self.pos_count >= DEBOUNCE_N;
        let deb_neg = self.neg_count >= DEBOUNCE_N;
        let rising_pos = deb_pos && !self.prev_deb_pos;
        let rising_neg = deb_neg && !self.prev_deb_neg;

        match self.state {
            DetectorState::Idle => {
                if rising_pos || rising_neg {
                    self.state = DetectorState::Armed;
                    self.timer = 0.0;
                    self.peak_abs_rate = abs_rate;
                    self.peak_sign = sign;
                }
            }
            DetectorState::Armed => {
                self.timer += dt;
                if abs_rate > self.peak_abs_rate {
                    self.peak_abs_rate = abs_rate;
                }

                let above_end = abs_rate > self.tuning.end_rate_rad;
                let same_sign = (sign >= 0.0) == (self.peak_sign >= 0.0);

                let timed_out = self.timer > self.tuning.max_duration;
                let dropped_below_end = !above_end && self.timer >= MIN_ARMED_SECS;
                // No minimum-armed-time guard on the reversal exit.
                let reversed_beyond_end = !same_sign && above_end;

                if timed_out || dropped_below_end || reversed_beyond_end {
                    let direction = if !timed_out && self.peak_abs_rate >= self.tuning.start_rate_rad
                    {
                        self.cooldown = self.tuning.cooldown.max(MIN_SUCCESS_COOLDOWN);
                        if self.peak_sign >= 0.0 { 1 } else { -1 }
                    } else {
                        // Rejection still imposes a minimum quiet period.
                        self.cooldown = REJECT_COOLDOWN;
                        0
                    };

                    self.state = DetectorState::Idle;
                    self.timer = 0.0;
                    self.peak_abs_rate = 0.0;
                    self.pos_count = 0;
                    self.neg_count = 0;
                    self.prev_deb_pos = deb_pos;
                    self.prev_deb_neg = deb_neg;
                    return direction;
                }
            }
        }

        self.prev_deb_pos = deb_pos;
        self.prev_deb_neg = deb_neg;
        0
    }
}
