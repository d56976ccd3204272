//! Serializable output records
//!
//! Flattened views of the engine's output, suitable for JSON handoff to
//! downstream indexing and review tooling.

use folio_core::Segment;
use folio_engine::{JobOutput, JobSummary};
use serde::{Deserialize, Serialize};

/// One segment, flattened for serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Position in the final segment list
    pub id: usize,
    /// First page (inclusive)
    pub start_page: usize,
    /// Last page (inclusive)
    pub end_page: usize,
    /// Number of pages
    pub page_count: usize,
    /// Classified document type
    pub kind: String,
    /// Document title, when one was read
    pub title: Option<String>,
    /// Confidence of the opening boundary
    pub confidence: f64,
    /// First printed Bates label observed in the segment
    pub bates_start: Option<String>,
    /// Last printed Bates label observed in the segment
    pub bates_end: Option<String>,
    /// Human-readable descriptions of recorded anomalies
    pub anomalies: Vec<String>,
}

impl From<&Segment> for SegmentRecord {
    fn from(segment: &Segment) -> Self {
        Self {
            id: segment.id,
            start_page: segment.start_page,
            end_page: segment.end_page,
            page_count: segment.page_count(),
            kind: segment.kind.to_string(),
            title: segment.title.clone(),
            confidence: segment.confidence,
            bates_start: segment.bates_range.start.as_ref().map(|l| l.to_string()),
            bates_end: segment.bates_range.end.as_ref().map(|l| l.to_string()),
            anomalies: segment.anomalies.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Run statistics, flattened for serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Id of the run
    pub job_id: String,
    /// Pages in the production
    pub total_pages: usize,
    /// Windows dispatched across all passes
    pub total_windows: usize,
    /// Segments in the final list
    pub total_segments: usize,
    /// Segments carrying at least one anomaly
    pub flagged_segments: usize,
    /// Windows degraded after retry exhaustion
    pub degraded_windows: usize,
    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
    /// Whether the advisory soft deadline was exceeded
    pub soft_deadline_exceeded: bool,
}

impl RunSummary {
    fn new(job_id: String, summary: &JobSummary) -> Self {
        Self {
            job_id,
            total_pages: summary.total_pages,
            total_windows: summary.total_windows,
            total_segments: summary.total_segments,
            flagged_segments: summary.flagged_segments,
            degraded_windows: summary.degraded_windows,
            elapsed_ms: summary.elapsed.as_millis() as u64,
            soft_deadline_exceeded: summary.soft_deadline_exceeded,
        }
    }
}

/// Complete output of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Ordered segments covering the whole production
    pub segments: Vec<SegmentRecord>,
    /// Run statistics for triage
    pub summary: RunSummary,
}

impl From<JobOutput> for Output {
    fn from(output: JobOutput) -> Self {
        Self {
            segments: output.segments.iter().map(SegmentRecord::from).collect(),
            summary: RunSummary::new(output.job_id.to_string(), &output.summary),
        }
    }
}

impl Output {
    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
