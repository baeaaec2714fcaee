//! Progress sink trait - a pure output side-channel.

use crate::pipeline::AnalysisPhase;

/// Receives phase transitions, percentage milestones, and log lines from
/// the pipeline.
///
/// Strictly one-way: nothing reported here feeds back into pipeline logic.
/// All methods default to no-ops so implementations pick what they care
/// about.
pub trait ProgressSink: Send + Sync {
    /// A phase has started.
    fn phase_started(&self, _phase: AnalysisPhase) {}

    /// A phase has completed.
    fn phase_completed(&self, _phase: AnalysisPhase) {}

    /// A phase has failed; the run is aborting.
    fn phase_failed(&self, _phase: AnalysisPhase) {}

    /// Overall progress milestone, `percent` in [0, 100].
    fn progress(&self, _percent: f32, _message: &str) {}

    /// Free-form log line.
    fn log(&self, _message: &str) {}
}
