//! Best-effort progress reporting
//!
//! The sink is infallible by contract: reporting failures on the
//! implementor's side must never reach the job.

use crate::job::{JobId, JobStage};

/// Receives fire-and-forget stage transitions from a running job
pub trait ProgressSink: Send + Sync {
    /// Report one stage transition
    fn report(&self, job_id: JobId, stage: JobStage, detail: &str);
}

/// Discards all progress reports
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _job_id: JobId, _stage: JobStage, _detail: &str) {}
}

/// Emits progress reports as tracing events under `folio::progress`
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceProgress;

impl ProgressSink for TraceProgress {
    fn report(&self, job_id: JobId, stage: JobStage, detail: &str) {
        tracing::info!(target: "folio::progress", job = %job_id, stage = %stage, detail, "progress");
    }
}
