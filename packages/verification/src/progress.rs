//! Progress sink implementations.

use tracing::{debug, info, warn};

use crate::pipeline::AnalysisPhase;
use crate::traits::progress::ProgressSink;

/// Discards all progress events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {}

/// Forwards progress events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn phase_started(&self, phase: AnalysisPhase) {
        info!(phase = %phase, number = phase.number(), "phase started");
    }

    fn phase_completed(&self, phase: AnalysisPhase) {
        info!(phase = %phase, number = phase.number(), "phase completed");
    }

    fn phase_failed(&self, phase: AnalysisPhase) {
        warn!(phase = %phase, number = phase.number(), "phase failed");
    }

    fn progress(&self, percent: f32, message: &str) {
        debug!(percent, message, "progress");
    }

    fn log(&self, message: &str) {
        info!("{message}");
    }
}
