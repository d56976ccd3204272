//! Orchestration for discovery production segmentation
//!
//! This crate drives the pure model in `folio-core` against the external
//! capabilities a real run needs: a page source, the boundary
//! classification oracle, and a progress sink. It owns retry and timeout
//! handling, bounded-concurrency window dispatch, the job state machine,
//! and the large-segment review pass.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod job;
pub mod oracle;
pub mod progress;
pub mod retry;
pub mod source;

// Re-export key types
pub use config::JobConfig;
pub use error::{EngineError, Result};
pub use job::{CancelHandle, JobId, JobOutput, JobStage, JobSummary, ProductionJob};
pub use oracle::{BoundaryOracle, OracleError};
pub use progress::{NullProgress, ProgressSink, TraceProgress};
pub use retry::RetryPolicy;
pub use source::{PageContent, PageLayout, PageSource, SourceError};

// Re-export from core for convenience
pub use folio_core::{
    Anomaly, BatesLabel, BatesRange, BoundaryCandidate, DocumentKind, ReconciledBoundary, Segment,
    Window,
};
