//! Layered error types for the orchestration engine

use folio_core::CoreError;
use thiserror::Error;

/// Engine-level errors
///
/// Almost nothing here aborts a job: oracle failures degrade windows and
/// data-quality issues become segment anomalies. The aborting paths are
/// configuration rejection, cancellation, and a broken partition invariant
/// surfacing as [`CoreError::IntegrityViolation`].
#[derive(Error, Debug)]
pub enum EngineError {
    /// Core model error (invalid geometry or a broken partition)
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Rejected job configuration; the job never starts
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The job was cancelled before its results were joined
    #[error("job cancelled")]
    Cancelled,

    /// A spawned window task panicked or was aborted
    #[error("window task failed: {0}")]
    TaskJoin(String),
}

impl EngineError {
    /// Whether this error represents a broken structural guarantee
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::Core(CoreError::IntegrityViolation(_)))
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
