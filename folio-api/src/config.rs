//! High-level configuration API

use crate::error::{ApiError, Result};
use folio_engine::JobConfig;
use std::time::Duration;

/// Validated configuration for a segmentation run
#[derive(Debug, Clone, Default)]
pub struct Config {
    inner: JobConfig,
}

impl Config {
    /// Finer windows and a lower review ceiling
    pub fn thorough() -> Self {
        Self {
            inner: JobConfig::thorough(),
        }
    }

    /// Wider windows for very large productions
    pub fn coarse() -> Self {
        Self {
            inner: JobConfig::coarse(),
        }
    }

    /// Create a builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub(crate) fn into_inner(self) -> JobConfig {
        self.inner
    }
}

/// Configuration builder; validates on `build()`
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: JobConfig,
}

impl ConfigBuilder {
    /// Set pages per classification window
    pub fn window_size(mut self, pages: usize) -> Self {
        self.config.window_size = pages;
        self
    }

    /// Set pages shared between consecutive windows
    pub fn window_overlap(mut self, pages: usize) -> Self {
        self.config.window_overlap = pages;
        self
    }

    /// Set the minimum confidence for a boundary to survive
    pub fn confidence_threshold(mut self, threshold: f64) -> Self {
        self.config.confidence_threshold = threshold;
        self
    }

    /// Set the page count above which a segment is re-examined
    pub fn large_segment_page_ceiling(mut self, pages: usize) -> Self {
        self.config.large_segment_page_ceiling = pages;
        self
    }

    /// Set the window geometry of the review pass
    pub fn review_windows(mut self, size: usize, overlap: usize) -> Self {
        self.config.review_window_size = size;
        self.config.review_window_overlap = overlap;
        self
    }

    /// Set oracle attempts per window, including the first
    pub fn max_oracle_attempts(mut self, attempts: usize) -> Self {
        self.config.max_oracle_attempts = attempts;
        self
    }

    /// Set the number of concurrent oracle calls
    pub fn oracle_concurrency(mut self, limit: usize) -> Self {
        self.config.oracle_concurrency = limit;
        self
    }

    /// Set the per-attempt oracle timeout
    pub fn oracle_timeout(mut self, timeout: Duration) -> Self {
        self.config.oracle_timeout = timeout;
        self
    }

    /// Set the advisory whole-job time budget
    pub fn soft_deadline(mut self, deadline: Duration) -> Self {
        self.config.soft_deadline = Some(deadline);
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<Config> {
        self.config
            .validate()
            .map_err(|err| ApiError::Config(err.to_string()))?;
        Ok(Config {
            inner: self.config,
        })
    }
}
