//! Public API for discovery production segmentation
//!
//! This crate provides a stable facade over the segmentation engine: a
//! validated configuration builder, one-call entry points, and serializable
//! output records that hide engine-internal types.

#![warn(missing_docs)]

pub mod config;
pub mod dto;
pub mod error;

use error::Result;
use folio_engine::{NullProgress, ProductionJob};
use std::sync::Arc;

// Re-export key types
pub use config::{Config, ConfigBuilder};
pub use dto::{Output, RunSummary, SegmentRecord};
pub use error::ApiError;

// Re-export the seams a caller implements or observes
pub use folio_core::{Anomaly, BatesLabel, BatesRange, DocumentKind, Segment};
pub use folio_engine::{
    BoundaryCandidate, BoundaryOracle, CancelHandle, JobId, JobStage, OracleError, PageContent,
    PageLayout, PageSource, ProgressSink, SourceError, TraceProgress, Window,
};

/// Main entry point for splitting a production into segments
///
/// Holds a validated configuration; each call to [`segment`] runs one
/// independent job against the supplied source and oracle.
///
/// [`segment`]: ProductionSegmenter::segment
#[derive(Debug, Clone, Default)]
pub struct ProductionSegmenter {
    config: Config,
}

impl ProductionSegmenter {
    /// Create a segmenter with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a segmenter with a custom configuration
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Build a job without running it, for callers that need the cancel
    /// handle or a custom progress sink before starting
    pub fn job(
        &self,
        source: Arc<dyn PageSource>,
        oracle: Arc<dyn BoundaryOracle>,
        progress: Arc<dyn ProgressSink>,
    ) -> ProductionJob {
        ProductionJob::new(self.config.clone().into_inner(), source, oracle, progress)
    }

    /// Segment a production, discarding progress reports
    pub async fn segment(
        &self,
        source: Arc<dyn PageSource>,
        oracle: Arc<dyn BoundaryOracle>,
    ) -> Result<Output> {
        self.segment_with_progress(source, oracle, Arc::new(NullProgress))
            .await
    }

    /// Segment a production, reporting stage transitions to `progress`
    pub async fn segment_with_progress(
        &self,
        source: Arc<dyn PageSource>,
        oracle: Arc<dyn BoundaryOracle>,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<Output> {
        let output = self.job(source, oracle, progress).run().await?;
        Ok(output.into())
    }
}

/// Segment a production with the default configuration
pub async fn segment_production(
    source: Arc<dyn PageSource>,
    oracle: Arc<dyn BoundaryOracle>,
) -> Result<Output> {
    ProductionSegmenter::new().segment(source, oracle).await
}
