//! Per-action cooldown gates layered above the recognizer
//!
//! Gameplay actions driven by flicks (lane change on the Up axis, collect
//! on the Right axis) carry their own cooldown independent of the
//! detector's re-arm timing. The normalized fill is what HUD cooldown
//! bars render.

/// Readiness gate for one flick-triggered action
#[derive(Debug, Clone, Copy)]
pub struct ActionGate {
    cooldown: f32,
    remaining: f32,
}

impl ActionGate {
    pub fn new(cooldown: f32) -> Self {
        Self {
            cooldown,
            remaining: 0.0,
        }
    }

    /// Advance the gate by one frame
    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
    }

    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Consume readiness and start the cooldown. Returns whether the
    /// action may fire this frame.
    pub fn try_fire(&mut self) -> bool {
        if self.ready() {
            self.remaining = self.cooldown;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// 0 just after firing, 1 when ready again; drives power/loading bars
    pub fn cooldown_norm(&self) -> f32 {
        1.0 - (self.remaining / self.cooldown.max(f32::EPSILON)).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}
