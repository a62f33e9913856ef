//! Data-driven recognizer balance
//!
//! Plain serde structs, validated once at load and immutable for the rest
//! of a session. Defaults carry the shipped gameplay constants. The
//! per-frame code assumes validated tuning and never re-checks ranges.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MIN_SUCCESS_COOLDOWN;

/// Tuning load or validation failure
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

fn out_of_range(field: &'static str, reason: &'static str) -> TuningError {
    TuningError::OutOfRange { field, reason }
}

/// Per-axis signal filter tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterTuning {
    /// Smoothing time constant while the signal grows (seconds)
    pub tau_attack: f32,
    /// Smoothing time constant while the signal shrinks (seconds)
    pub tau_release: f32,
    /// Soft deadzone half-width (rad/s)
    pub deadzone: f32,
}

impl Default for FilterTuning {
    fn default() -> Self {
        Self {
            tau_attack: 0.020,
            tau_release: 0.080,
            deadzone: 0.05, // ~3 deg/s
        }
    }
}

/// Flick detector tuning (shared by both axes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorTuning {
    /// Rate that a candidate gesture must exceed to arm (rad/s)
    pub start_rate_rad: f32,
    /// Rate below which an armed gesture completes (rad/s)
    pub end_rate_rad: f32,
    /// Longest a gesture may stay armed before it is rejected (seconds)
    pub max_duration: f32,
    /// Cooldown after an accepted flick; floored at 0.08 s on success
    pub cooldown: f32,
}

impl Default for DetectorTuning {
    fn default() -> Self {
        Self {
            start_rate_rad: 1.1,
            end_rate_rad: 0.8,
            max_duration: 0.35,
            cooldown: 0.45,
        }
    }
}

/// Channel rest-gate tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelTuning {
    /// The smoothed rate must dip below this once after an emitted event
    /// before the channel accepts another (rad/s)
    pub rest_rate: f32,
}

impl Default for ChannelTuning {
    fn default() -> Self {
        Self { rest_rate: 0.25 }
    }
}

/// Cross-talk gating tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossTalkTuning {
    /// Minimum fraction of the combined vector magnitude attributable to
    /// an axis for its signal to be trusted
    pub purity_min: f32,
    /// The other axis suppresses this one when it exceeds this ratio of
    /// this axis's magnitude (and the minimum arm magnitude)
    pub dominance_ratio: f32,
    /// Minimum arm magnitude as a multiple of the detector start rate
    pub min_arm_mag_scale: f32,
    /// Acceptance half-angle to start a gesture (degrees)
    pub arm_cone_deg: f32,
    /// Wider half-angle to keep an already-armed gesture (degrees)
    pub keep_cone_deg: f32,
}

impl Default for CrossTalkTuning {
    fn default() -> Self {
        Self {
            purity_min: 0.75,
            dominance_ratio: 1.40,
            min_arm_mag_scale: 0.85,
            arm_cone_deg: 16.0,
            keep_cone_deg: 28.0,
        }
    }
}

/// Complete recognizer tuning
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickTuning {
    pub filter: FilterTuning,
    pub detector: DetectorTuning,
    pub channel: ChannelTuning,
    pub cross_talk: CrossTalkTuning,
}

impl FlickTuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded flick tuning");
        Ok(tuning)
    }

    /// Check every field against its documented range
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.filter.tau_attack > 0.0) {
            return Err(out_of_range("filter.tau_attack", "must be > 0"));
        }
        if !(self.filter.tau_release > 0.0) {
            return Err(out_of_range("filter.tau_release", "must be > 0"));
        }
        if !(self.filter.deadzone >= 0.0) {
            return Err(out_of_range("filter.deadzone", "must be >= 0"));
        }
        if !(self.detector.end_rate_rad > 0.0) {
            return Err(out_of_range("detector.end_rate_rad", "must be > 0"));
        }
        if !(self.detector.start_rate_rad > self.detector.end_rate_rad) {
            return Err(out_of_range(
                "detector.start_rate_rad",
                "must exceed end_rate_rad",
            ));
        }
        if !(self.detector.max_duration > 0.0) {
            return Err(out_of_range("detector.max_duration", "must be > 0"));
        }
        if !(self.detector.cooldown >= MIN_SUCCESS_COOLDOWN) {
            return Err(out_of_range("detector.cooldown", "must be >= 0.08 s"));
        }
        if !(self.channel.rest_rate >= 0.0) {
            return Err(out_of_range("channel.rest_rate", "must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.cross_talk.purity_min) {
            return Err(out_of_range("cross_talk.purity_min", "must be in [0, 1]"));
        }
        if !(self.cross_talk.dominance_ratio >= 1.0) {
            return Err(out_of_range("cross_talk.dominance_ratio", "must be >= 1"));
        }
        if !(self.cross_talk.min_arm_mag_scale >= 0.0) {
            return Err(out_of_range("cross_talk.min_arm_mag_scale", "must be >= 0"));
        }
        if !(0.0..=90.0).contains(&self.cross_talk.arm_cone_deg) {
            return Err(out_of_range("cross_talk.arm_cone_deg", "must be in [0, 90]"));
        }
        if !(0.0..=90.0).contains(&self.cross_talk.keep_cone_deg) {
            return Err(out_of_range(
                "cross_talk.keep_cone_deg",
                "must be in [0, 90]",
            ));
        }
        if self.cross_talk.keep_cone_deg < self.cross_talk.arm_cone_deg {
            return Err(out_of_range(
                "cross_talk.keep_cone_deg",
                "must be >= arm_cone_deg",
            ));
        }
        Ok(())
    }
}
