//! Pure segmentation model for legal discovery productions
//!
//! This crate holds the data model and the deterministic algorithms that
//! turn unreliable per-window boundary observations into a validated,
//! gap-free partition of a production's page range. It performs no IO and
//! owns no concurrency; orchestration lives in `folio-engine`.

#![warn(missing_docs)]

pub mod bates;
pub mod error;
pub mod reconcile;
pub mod segment;
pub mod types;
pub mod window;

// Re-export key types
pub use bates::{scan_range, BatesLabel, BatesRange};
pub use error::{CoreError, Result};
pub use reconcile::Reconciler;
pub use segment::{flag_bates_regressions, verify_partition, SegmentBuilder};
pub use types::{
    Anomaly, BoundaryCandidate, DocumentKind, ReconciledBoundary, Segment, Window,
};
pub use window::plan_windows;
