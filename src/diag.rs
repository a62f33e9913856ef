//! Injectable diagnostics for recognizer tuning sessions
//!
//! Not part of the recognition contract. A sink sees every raw sample
//! before filtering; the default path costs nothing.

/// Observation hook fed once per frame
pub trait DiagnosticsSink {
    fn observe_raw(&mut self, u_raw: f32, r_raw: f32);
}

/// Sink that ignores everything
pub struct NoDiagnostics;

impl DiagnosticsSink for NoDiagnostics {
    fn observe_raw(&mut self, _u_raw: f32, _r_raw: f32) {}
}

/// Records the largest rate magnitudes seen per axis, for picking start
/// and end thresholds from recorded play sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct RateExtremes {
    pub max_up: f32,
    pub max_right: f32,
}

impl DiagnosticsSink for RateExtremes {
    fn observe_raw(&mut self, u_raw: f32, r_raw: f32) {
        self.max_up = self.max_up.max(u_raw.abs());
        self.max_right = self.max_right.max(r_raw.abs());
    }
}
