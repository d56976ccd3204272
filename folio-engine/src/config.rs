//! Job configuration

use crate::error::{EngineError, Result};
use std::time::Duration;

/// All tuning knobs for one segmentation job
///
/// Every job carries its own configuration, so differently-tuned jobs run
/// concurrently in one process without shared state.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Pages per classification window
    pub window_size: usize,
    /// Pages shared between consecutive windows
    pub window_overlap: usize,
    /// Minimum reconciled confidence for a boundary to survive
    pub confidence_threshold: f64,
    /// Page distance within which candidates merge to one boundary
    pub page_tolerance: usize,
    /// Page count above which a segment is re-examined
    pub large_segment_page_ceiling: usize,
    /// Window size for the finer-grained review pass
    pub review_window_size: usize,
    /// Window overlap for the finer-grained review pass
    pub review_window_overlap: usize,
    /// Oracle attempts per window, including the first
    pub max_oracle_attempts: usize,
    /// Concurrent oracle calls in flight
    pub oracle_concurrency: usize,
    /// Per-attempt oracle call timeout
    pub oracle_timeout: Duration,
    /// Delay before the first oracle retry
    pub retry_base_delay: Duration,
    /// Ceiling on any single retry delay
    pub retry_max_delay: Duration,
    /// Jitter applied to retry delays, as a fraction
    pub retry_jitter_pct: f64,
    /// Advisory whole-job time budget; measured and surfaced, never enforced
    pub soft_deadline: Option<Duration>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            window_size: 25,
            window_overlap: 5,
            confidence_threshold: 0.7,
            page_tolerance: 1,
            large_segment_page_ceiling: 50,
            review_window_size: 10,
            review_window_overlap: 2,
            max_oracle_attempts: 3,
            oracle_concurrency: 4,
            oracle_timeout: Duration::from_secs(60),
            retry_base_delay: Duration::from_millis(500),
            retry_max_delay: Duration::from_secs(8),
            retry_jitter_pct: 0.2,
            soft_deadline: None,
        }
    }
}

impl JobConfig {
    /// Finer windows and a lower review ceiling, for productions where
    /// missed boundaries are expensive
    pub fn thorough() -> Self {
        Self {
            window_size: 15,
            window_overlap: 5,
            large_segment_page_ceiling: 30,
            review_window_size: 6,
            review_window_overlap: 2,
            ..Self::default()
        }
    }

    /// Wider windows for very large productions where oracle cost dominates
    pub fn coarse() -> Self {
        Self {
            window_size: 40,
            window_overlap: 8,
            large_segment_page_ceiling: 80,
            review_window_size: 15,
            review_window_overlap: 3,
            ..Self::default()
        }
    }

    /// Reject unusable configurations before any work starts
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            return Err(EngineError::InvalidConfig(format!(
                "window_size must be at least 2, got {}",
                self.window_size
            )));
        }
        if self.window_overlap >= self.window_size {
            return Err(EngineError::InvalidConfig(format!(
                "window_overlap {} must be smaller than window_size {}",
                self.window_overlap, self.window_size
            )));
        }
        if self.review_window_size < 2 {
            return Err(EngineError::InvalidConfig(format!(
                "review_window_size must be at least 2, got {}",
                self.review_window_size
            )));
        }
        if self.review_window_overlap >= self.review_window_size {
            return Err(EngineError::InvalidConfig(format!(
                "review_window_overlap {} must be smaller than review_window_size {}",
                self.review_window_overlap, self.review_window_size
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.large_segment_page_ceiling == 0 {
            return Err(EngineError::InvalidConfig(
                "large_segment_page_ceiling must be positive".to_string(),
            ));
        }
        if self.max_oracle_attempts == 0 {
            return Err(EngineError::InvalidConfig(
                "max_oracle_attempts must be positive".to_string(),
            ));
        }
        if self.oracle_concurrency == 0 {
            return Err(EngineError::InvalidConfig(
                "oracle_concurrency must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
