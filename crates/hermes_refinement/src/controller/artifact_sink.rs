use super::refinement_report::{AttemptFailure, IterationRecord, RefinementReport};

/// Receives the artifacts of a run as they are produced. Failures are logged
/// by the controller and never stop the run.
pub trait ArtifactSink {
    fn record_iteration(&mut self, record: &IterationRecord) -> anyhow::Result<()>;

    fn record_failure(&mut self, _failure: &AttemptFailure) -> anyhow::Result<()> {
        Ok(())
    }

    fn record_report(&mut self, report: &RefinementReport) -> anyhow::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ArtifactSink for NoopSink {
    fn record_iteration(&mut self, _record: &IterationRecord) -> anyhow::Result<()> {
        Ok(())
    }

    fn record_report(&mut self, _report: &RefinementReport) -> anyhow::Result<()> {
        Ok(())
    }
}
