//! Per-frame cross-talk orchestration over the two axis channels
//!
//! Physical flicks are never perfectly axis-aligned, so each frame the
//! recognizer decides how much of each axis's filtered signal is
//! trustworthy evidence of an intentional gesture along that axis. The
//! combined vector's angle is gated against a cone whose half-angle
//! widens once a detector is armed (hysteresis), the opposite axis can
//! suppress this one outright (dominance), and ambiguous off-axis motion
//! is discarded (purity). Whatever survives is fed to the detectors; a
//! gated-out axis still receives a frame tick with zero evidence.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use crate::channel::AxisChannel;
use crate::consts::MAG_EPSILON;
use crate::diag::{DiagnosticsSink, NoDiagnostics};
use crate::tuning::{CrossTalkTuning, FlickTuning};

/// Device axis a gesture was recognized on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Up,
    Right,
}

/// One recognized flick. Produced at most once per axis per frame and
/// meant to be consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub axis: Axis,
    pub direction: i32,
}

/// Per-frame recognizer output: -1, 0, or +1 per axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameEvents {
    pub up: i32,
    pub right: i32,
}

impl FrameEvents {
    pub fn is_empty(&self) -> bool {
        self.up == 0 && self.right == 0
    }

    /// The zero, one, or two events emitted this frame
    pub fn iter(&self) -> impl Iterator<Item = GestureEvent> {
        [(Axis::Up, self.up), (Axis::Right, self.right)]
            .into_iter()
            .filter(|&(_, direction)| direction != 0)
            .map(|(axis, direction)| GestureEvent { axis, direction })
    }
}

/// Gate decision for one axis this frame
struct AxisGate {
    feed: f32,
    dominated: bool,
}

/// Cross-talk gate for one axis; invoked twice per frame with the axes
/// swapped. `axis_angle` is the combined vector's angle relative to this
/// axis (0 = pure this-axis motion).
fn gate_axis(
    this: f32,
    other: f32,
    axis_angle: f32,
    armed: bool,
    magnitude: f32,
    min_arm_mag: f32,
    ct: &CrossTalkTuning,
) -> AxisGate {
    // Narrow cone to arm, wider cone to keep once armed.
    let cone = if armed {
        ct.keep_cone_deg
    } else {
        ct.arm_cone_deg
    }
    .to_radians();
    let in_cone = axis_angle.abs() <= cone;

    let dominated = other.abs() > this.abs() * ct.dominance_ratio && other.abs() > min_arm_mag;

    // Below-threshold motion is exempt from purity: it cannot arm anything.
    let purity = this.abs() / magnitude;
    let purity_ok = purity >= ct.purity_min || magnitude < min_arm_mag;

    AxisGate {
        feed: if in_cone && purity_ok && !dominated {
            this
        } else {
            0.0
        },
        dominated,
    }
}

/// Two-axis flick recognizer: the host calls `update` once per frame
#[derive(Debug, Clone)]
pub struct FlickRecognizer {
    tuning: FlickTuning,
    up: AxisChannel,
    right: AxisChannel,
}

impl FlickRecognizer {
    pub fn new(tuning: FlickTuning) -> Self {
        Self {
            up: AxisChannel::new(&tuning),
            right: AxisChannel::new(&tuning),
            tuning,
        }
    }

    pub fn tuning(&self) -> &FlickTuning {
        &self.tuning
    }

    /// Restore session-start state. A stale armed/cooldown state must not
    /// suppress or spuriously fire the first flick of a new run.
    pub fn reset(&mut self) {
        self.up.reset();
        self.right.reset();
    }

    /// Advance one frame with raw rad/s rates and the frame timestep
    pub fn update(&mut self, u_raw: f32, r_raw: f32, dt: f32) -> FrameEvents {
        self.update_with(u_raw, r_raw, dt, &mut NoDiagnostics)
    }

    /// `update` with a diagnostics sink observing the raw samples
    pub fn update_with(
        &mut self,
        u_raw: f32,
        r_raw: f32,
        dt: f32,
        diag: &mut dyn DiagnosticsSink,
    ) -> FrameEvents {
        diag.observe_raw(u_raw, r_raw);

        let u = self.up.step_filter(u_raw, dt);
        let r = self.right.step_filter(r_raw, dt);

        self.up.decay(u, dt);
        self.right.decay(r, dt);

        let magnitude = Vec2::new(u, r).length() + MAG_EPSILON;
        let ct = &self.tuning.cross_talk;
        let min_arm_mag = self.tuning.detector.start_rate_rad * ct.min_arm_mag_scale;

        // 0 = pure Up, +90 deg = pure Right.
        let angle_up = r.atan2(u);
        let angle_right = angle_up - FRAC_PI_2;

        let up_gate = gate_axis(u, r, angle_up, self.up.is_armed(), magnitude, min_arm_mag, ct);
        let right_gate = gate_axis(
            r,
            u,
            angle_right,
            self.right.is_armed(),
            magnitude,
            min_arm_mag,
            ct,
        );

        // A strong off-axis motion must not partially arm the wrong axis.
        if up_gate.dominated && !self.up.is_armed() {
            self.up.clear_debounce();
        }
        if right_gate.dominated && !self.right.is_armed() {
            self.right.clear_debounce();
        }

        let events = FrameEvents {
            up: self.up.submit(up_gate.feed, dt),
            right: self.right.submit(right_gate.feed, dt),
        };
        if events.up != 0 {
            log::debug!("up flick, direction {}", events.up);
        }
        if events.right != 0 {
            log::debug!("right flick, direction {}", events.right);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::RateExtremes;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn recognizer() -> FlickRecognizer {
        FlickRecognizer::new(FlickTuning::default())
    }

    /// Drive a raw (u, r) sequence and collect all emitted events
    fn drive(rec: &mut FlickRecognizer, samples: &[(f32, f32)]) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        for &(u, r) in samples {
            events.extend(rec.update(u, r, DT).iter());
        }
        events
    }

    /// A clean single-axis pulse: `frames` of `rate`, then a long rest
    fn pulse(rate: f32, frames: usize, rest: usize) -> Vec<f32> {
        let mut seq = vec![rate; frames];
        seq.extend(std::iter::repeat_n(0.0, rest));
        seq
    }

    #[test]
    fn test_quiet_input_stays_at_rest() {
        let mut rec = recognizer();
        for _ in 0..300 {
            assert!(rec.update(0.0, 0.0, DT).is_empty());
        }
        assert!(!rec.up.is_armed());
        assert!(!rec.right.is_armed());
    }

    #[test]
    fn test_up_flick_emits_exactly_one_up_event() {
        let mut rec = recognizer();
        let samples: Vec<(f32, f32)> = pulse(2.0, 6, 40).into_iter().map(|u| (u, 0.0)).collect();
        let events = drive(&mut rec, &samples);
        assert_eq!(
            events,
            vec![GestureEvent {
                axis: Axis::Up,
                direction: 1
            }]
        );
    }

    #[test]
    fn test_right_flick_emits_exactly_one_right_event() {
        let mut rec = recognizer();
        let samples: Vec<(f32, f32)> = pulse(2.0, 6, 40).into_iter().map(|r| (0.0, r)).collect();
        let events = drive(&mut rec, &samples);
        assert_eq!(
            events,
            vec![GestureEvent {
                axis: Axis::Right,
                direction: 1
            }]
        );
    }

    #[test]
    fn test_same_pattern_refires_after_cooldown_and_rest() {
        // Two identical up pulses separated by a 1 s rest: long enough
        // for the detector cooldown to drain and the smoothed rate to
        // dip below the channel rest rate.
        let mut rec = recognizer();
        let mut samples: Vec<(f32, f32)> = Vec::new();
        samples.extend(pulse(2.0, 6, 60).into_iter().map(|u| (u, 0.0)));
        samples.extend(pulse(2.0, 6, 60).into_iter().map(|u| (u, 0.0)));
        let events = drive(&mut rec, &samples);
        assert_eq!(
            events,
            vec![
                GestureEvent {
                    axis: Axis::Up,
                    direction: 1
                };
                2
            ]
        );
    }

    #[test]
    fn test_dominant_right_suppresses_up() {
        // Right rate at twice the start threshold; Up rate strong enough
        // to arm on its own, but below Right / dominance_ratio.
        let right = 1.1 * 2.0;
        let up = right / 1.4 * 0.9;
        let mut rec = recognizer();
        let mut samples: Vec<(f32, f32)> = vec![(up, right); 10];
        samples.extend(std::iter::repeat_n((0.0, 0.0), 40));
        let events = drive(&mut rec, &samples);
        assert!(
            events.iter().all(|e| e.axis != Axis::Up),
            "up axis fired despite right dominance: {events:?}"
        );
    }

    #[test]
    fn test_arm_cone_rejects_off_axis_start() {
        // Vector 17 degrees off the Up axis: outside the 16 degree arm
        // cone, so the Up detector must never arm.
        let angle = 17.0_f32.to_radians();
        let (u, r) = (3.0 * angle.cos(), 3.0 * angle.sin());
        let mut rec = recognizer();
        for _ in 0..30 {
            let events = rec.update(u, r, DT);
            assert!(events.is_empty());
            assert!(!rec.up.is_armed());
        }
    }

    #[test]
    fn test_keep_cone_continues_armed_gesture() {
        let mut rec = recognizer();
        // Arm cleanly along Up.
        rec.update(3.0, 0.0, DT);
        rec.update(3.0, 0.0, DT);
        assert!(rec.up.is_armed());

        // Drift to 27 degrees: outside the arm cone, inside the keep cone.
        let angle = 27.0_f32.to_radians();
        let (u, r) = (3.0 * angle.cos(), 3.0 * angle.sin());
        for _ in 0..3 {
            rec.update(u, r, DT);
            assert!(rec.up.is_armed(), "keep cone failed to hold the gesture");
        }
    }

    #[test]
    fn test_reset_then_replay_is_identical() {
        let mut samples: Vec<(f32, f32)> = Vec::new();
        samples.extend(pulse(2.0, 6, 40).into_iter().map(|u| (u, 0.0)));
        samples.extend(pulse(2.0, 6, 40).into_iter().map(|r| (0.0, r)));

        let mut rec = recognizer();
        let first = drive(&mut rec, &samples);
        rec.reset();
        let second = drive(&mut rec, &samples);

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_flick_detected_through_seeded_noise() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
        let mut rec = recognizer();

        let mut up_events = 0;
        let mut right_events = 0;
        for frame in 0..240 {
            let aim = if (60..70).contains(&frame) { 2.0 } else { 0.0 };
            let u = aim + rng.random_range(-0.3..0.3);
            let r = rng.random_range(-0.3..0.3);
            let events = rec.update(u, r, DT);
            up_events += i32::from(events.up != 0);
            right_events += i32::from(events.right != 0);
        }
        assert_eq!(up_events, 1);
        assert_eq!(right_events, 0);
    }

    #[test]
    fn test_diagnostics_sink_sees_raw_samples() {
        let mut rec = recognizer();
        let mut extremes = RateExtremes::default();
        rec.update_with(0.5, -2.5, DT, &mut extremes);
        rec.update_with(-1.0, 0.0, DT, &mut extremes);
        assert_eq!(extremes.max_up, 1.0);
        assert_eq!(extremes.max_right, 2.5);
    }

    #[test]
    fn test_frame_events_iter() {
        let events = FrameEvents { up: 1, right: -1 };
        let collected: Vec<_> = events.iter().collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].axis, Axis::Up);
        assert_eq!(collected[1].direction, -1);
        assert!(FrameEvents::default().iter().next().is_none());
    }

    proptest! {
        /// Rates that never reach the start threshold can never emit,
        /// whatever their shape.
        #[test]
        fn prop_sub_threshold_noise_never_emits(
            samples in prop::collection::vec((-0.9f32..0.9, -0.9f32..0.9), 0..300)
        ) {
            let mut rec = recognizer();
            for (u, r) in samples {
                prop_assert!(rec.update(u, r, DT).is_empty());
            }
        }

        /// Two recognizers fed the same inputs agree frame by frame.
        #[test]
        fn prop_replay_is_deterministic(
            samples in prop::collection::vec((-3.0f32..3.0, -3.0f32..3.0), 0..200)
        ) {
            let mut a = recognizer();
            let mut b = recognizer();
            for &(u, r) in &samples {
                prop_assert_eq!(a.update(u, r, DT), b.update(u, r, DT));
            }
        }
    }
}
