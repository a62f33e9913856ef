//! Gyro Flick - two-axis flick gesture recognition
//!
//! Turns noisy, high-rate angular-velocity samples (device rotation rate
//! around the "Up" and "Right" device axes) into discrete signed gesture
//! events usable to drive gameplay actions. The recognizer is pure
//! computation over scalar time series: it owns no engine resources and
//! performs no I/O. The host calls it once per frame with a timestep and
//! two raw rates, and consumes zero, one, or two events in return.
//!
//! Core modules:
//! - `filter`: per-axis denoising (median despike, attack/release EMA, deadzone)
//! - `detector`: debounced peak-tracking flick state machine
//! - `channel`: filter + detector plus rest/cooldown gating
//! - `recognizer`: per-frame cross-talk orchestration over both axes
//! - `tuning`: data-driven recognizer balance
//! - `action`: per-action cooldown gates for the gameplay layer
//! - `diag`: injectable diagnostics for tuning sessions

pub mod action;
pub mod channel;
pub mod detector;
pub mod diag;
pub mod filter;
pub mod recognizer;
pub mod tuning;

pub use action::ActionGate;
pub use recognizer::{Axis, FlickRecognizer, FrameEvents, GestureEvent};
pub use tuning::{FlickTuning, TuningError};

/// Recognizer constants shared across modules
pub mod consts {
    /// Internal timestep clamp for detector timing (a stalled frame must
    /// not satisfy the duration window or corrupt peak tracking)
    pub const DETECTOR_MAX_DT: f32 = 1.0 / 45.0;
    /// Consecutive qualifying frames required to accept a threshold crossing
    pub const DEBOUNCE_N: u32 = 2;
    /// Saturation cap for the debounce counters
    pub const DEBOUNCE_CAP: u32 = 1000;
    /// Minimum armed time before the drop-below-end exit is eligible
    pub const MIN_ARMED_SECS: f32 = 0.02;
    /// Floor for the cooldown applied after an accepted flick
    pub const MIN_SUCCESS_COOLDOWN: f32 = 0.08;
    /// Quiet period imposed after a rejected gesture
    pub const REJECT_COOLDOWN: f32 = 0.08;
    /// Channel-level cooldown that defeats rebound doubles
    pub const CHANNEL_COOLDOWN: f32 = 0.18;
    /// Floor for smoothing time constants
    pub const MIN_TAU: f32 = 1e-6;
    /// Epsilon added to the combined vector magnitude before division
    pub const MAG_EPSILON: f32 = 1e-6;
}

/// Median of three samples (rejects single-frame outliers)
#[inline]
pub fn median3(a: f32, b: f32, c: f32) -> f32 {
    a + b + c - a.min(b).min(c) - a.max(b).max(c)
}

/// Soft deadzone: zero inside the band, shifted down in magnitude outside.
/// Continuous at the boundary and sign-preserving.
#[inline]
pub fn soft_deadzone(x: f32, deadzone: f32) -> f32 {
    let ax = x.abs();
    if ax <= deadzone {
        0.0
    } else {
        x.signum() * (ax - deadzone)
    }
}

/// Convert a deg/s rate pair to rad/s, for gyro sources that report degrees
#[inline]
pub fn rates_deg_to_rad(u_deg: f32, r_deg: f32) -> (f32, f32) {
    (u_deg.to_radians(), r_deg.to_radians())
}
