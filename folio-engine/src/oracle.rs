//! Boundary classification seam
//!
//! The classifier is an external, non-deterministic capability. Keeping it
//! behind an object-safe trait lets reconciliation and segmentation run
//! against deterministic stubs in tests and makes the backend swappable.

use crate::source::PageContent;
use async_trait::async_trait;
use folio_core::{BoundaryCandidate, Window};
use thiserror::Error;

/// Errors from a single classification call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The call exceeded the configured per-attempt timeout
    #[error("classification call timed out")]
    Timeout,

    /// The backend refused the call due to rate limiting
    #[error("classification backend rate limited")]
    RateLimited,

    /// The call failed in transit
    #[error("classification transport failed: {0}")]
    Transport(String),

    /// The backend answered with something unusable
    #[error("malformed classification response: {0}")]
    Malformed(String),
}

impl OracleError {
    /// Whether a retry could plausibly succeed. A malformed response is a
    /// contract failure, not a transient condition, and is never retried.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Malformed(_))
    }
}

/// Proposes document boundaries for one window of pages
///
/// Output is untrusted: boundaries may be missing, invented, or
/// mis-scored. Implementations must be safe to retry; duplicate candidates
/// from a retried call collapse during reconciliation.
#[async_trait]
pub trait BoundaryOracle: Send + Sync {
    /// Classify one window, returning zero or more boundary candidates
    /// whose `page_index` values are absolute production page indices.
    async fn classify(
        &self,
        window: &Window,
        pages: &[PageContent],
    ) -> Result<Vec<BoundaryCandidate>, OracleError>;
}
