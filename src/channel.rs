//! One per-axis channel: filter + detector + rest/cooldown gate
//!
//! The detector's own cooldown governs its re-arm; the channel adds a
//! second gate above the detector output so a single physical flick that
//! the IMU reports as two oscillations cannot count twice. After an
//! emitted event the channel refuses further events until its manual
//! cooldown elapses and the smoothed signal has visibly returned to rest.

use crate::consts::CHANNEL_COOLDOWN;
use crate::detector::FlickDetector;
use crate::filter::AxisFilter;
use crate::tuning::FlickTuning;

/// Filter + detector pipeline for one axis
#[derive(Debug, Clone)]
pub struct AxisChannel {
    filter: AxisFilter,
    detector: FlickDetector,
    rest_rate: f32,
    needs_rest: bool,
    manual_cooldown: f32,
}

impl AxisChannel {
    pub fn new(tuning: &FlickTuning) -> Self {
        Self {
            filter: AxisFilter::new(tuning.filter),
            detector: FlickDetector::new(tuning.detector),
            rest_rate: tuning.channel.rest_rate,
            needs_rest: false,
            manual_cooldown: 0.0,
        }
    }

    /// Restore session-start state
    pub fn reset(&mut self) {
        self.filter.reset();
        self.detector.reset();
        self.needs_rest = false;
        self.manual_cooldown = 0.0;
    }

    /// Run the axis filter for this frame
    pub fn step_filter(&mut self, raw: f32, dt: f32) -> f32 {
        self.filter.step(raw, dt)
    }

    pub fn is_armed(&self) -> bool {
        self.detector.is_armed()
    }

    pub fn needs_rest(&self) -> bool {
        self.needs_rest
    }

    pub fn detector(&self) -> &FlickDetector {
        &self.detector
    }

    pub(crate) fn clear_debounce(&mut self) {
        self.detector.clear_debounce();
    }

    /// Tick the manual cooldown and clear the rest flag once the smoothed
    /// signal has dipped back near zero
    pub fn decay(&mut self, smoothed: f32, dt: f32) {
        if self.manual_cooldown > 0.0 {
            self.manual_cooldown = (self.manual_cooldown - dt).max(0.0);
        }
        if self.needs_rest && smoothed.abs() < self.rest_rate {
            self.needs_rest = false;
        }
    }

    /// Feed the detector and apply the channel gate. Returns -1, 0, or +1.
    pub fn submit(&mut self, feed: f32, dt: f32) -> i32 {
        let direction = self.detector.update(feed, dt);
        if direction == 0 {
            return 0;
        }

        if self.manual_cooldown <= 0.0 && !self.needs_rest {
            self.manual_cooldown = CHANNEL_COOLDOWN;
            self.needs_rest = true;
            direction
        } else {
            log::trace!("flick suppressed by channel gate (dir {direction})");
            0
        }
    }
}
