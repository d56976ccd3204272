//! Production job orchestration
//!
//! One job turns one production into a validated segment list. The job is a
//! state machine: windows are planned, classified concurrently under a
//! bounded permit count, reconciled, built into segments, and oversized
//! segments get one finer-grained review pass. Oracle failures degrade
//! individual windows and data-quality findings become segment anomalies;
//! the only aborting failures past validation are cancellation and a broken
//! partition invariant.

use crate::{
    config::JobConfig,
    error::{EngineError, Result},
    oracle::{BoundaryOracle, OracleError},
    progress::ProgressSink,
    retry::RetryPolicy,
    source::{PageContent, PageSource},
};
use folio_core::{
    flag_bates_regressions, plan_windows, verify_partition, Anomaly, BatesLabel,
    BoundaryCandidate, Reconciler, Segment, SegmentBuilder, Window,
};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Unique identifier of one job run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a fresh id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stages a job moves through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    /// Accepted, not yet started
    Pending,
    /// Planning windows and fetching pages
    Windowing,
    /// Concurrent oracle calls in flight
    Classifying,
    /// Merging candidates into ordered boundaries
    Reconciling,
    /// Building and validating the partition
    Segmenting,
    /// Re-examining oversized segments
    LargeSegmentReview,
    /// Finished with a valid segment list
    Completed,
    /// Aborted on a broken structural guarantee
    Failed,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Windowing => "windowing",
            Self::Classifying => "classifying",
            Self::Reconciling => "reconciling",
            Self::Segmenting => "segmenting",
            Self::LargeSegmentReview => "large_segment_review",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Cooperative cancellation flag, cloneable across tasks
///
/// Cancellation is observed before each oracle dispatch and at the join;
/// in-flight calls run to completion so oracle-side state is never left
/// half-written, but their results are discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Create an uncancelled handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Final result of a completed job
#[derive(Debug, Clone)]
pub struct JobOutput {
    /// Id of the run that produced this output
    pub job_id: JobId,
    /// Ordered, validated segments covering the whole production
    pub segments: Vec<Segment>,
    /// Run statistics for triage
    pub summary: JobSummary,
}

/// Run statistics surfaced alongside the segments
#[derive(Debug, Clone)]
pub struct JobSummary {
    /// Pages in the production
    pub total_pages: usize,
    /// Windows dispatched across all passes
    pub total_windows: usize,
    /// Segments in the final list
    pub total_segments: usize,
    /// Segments carrying at least one anomaly
    pub flagged_segments: usize,
    /// Windows that produced no candidates after retry exhaustion
    pub degraded_windows: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
    /// Whether the advisory soft deadline was exceeded
    pub soft_deadline_exceeded: bool,
}

enum WindowOutcome {
    Classified(Vec<BoundaryCandidate>),
    Degraded,
    Skipped,
}

/// One segmentation run over one production
pub struct ProductionJob {
    id: JobId,
    config: JobConfig,
    source: Arc<dyn PageSource>,
    oracle: Arc<dyn BoundaryOracle>,
    progress: Arc<dyn ProgressSink>,
    cancel: CancelHandle,
}

impl ProductionJob {
    /// Create a job over the given source and oracle
    pub fn new(
        config: JobConfig,
        source: Arc<dyn PageSource>,
        oracle: Arc<dyn BoundaryOracle>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            id: JobId::new(),
            config,
            source,
            oracle,
            progress,
            cancel: CancelHandle::new(),
        }
    }

    /// This run's id
    pub fn id(&self) -> JobId {
        self.id
    }

    /// The job's configuration
    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Handle for cancelling this job from another task
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run the job to completion
    pub async fn run(&self) -> Result<JobOutput> {
        let started = Instant::now();
        self.transition(JobStage::Pending, "job accepted");
        self.config.validate()?;

        self.transition(JobStage::Windowing, "fetching pages");
        let total_pages = self.source.page_count();
        if total_pages == 0 {
            return Err(EngineError::InvalidConfig(
                "production has no pages".to_string(),
            ));
        }
        let mut pages = Vec::with_capacity(total_pages);
        for index in 0..total_pages {
            match self.source.page(index) {
                Ok(content) => pages.push(content),
                Err(err) => {
                    warn!(job = %self.id, page = index, error = %err,
                        "page fetch failed, substituting empty text");
                    pages.push(PageContent::empty());
                }
            }
        }
        let page_labels: Vec<Option<BatesLabel>> =
            pages.iter().map(|p| p.bates_label.clone()).collect();
        let pages = Arc::new(pages);
        let windows = plan_windows(
            total_pages,
            self.config.window_size,
            self.config.window_overlap,
        )?;

        self.transition(
            JobStage::Classifying,
            &format!("{} windows over {} pages", windows.len(), total_pages),
        );
        let mut total_windows = windows.len();
        let (candidates, mut degraded_windows) = self.dispatch_windows(&windows, &pages).await?;

        self.transition(
            JobStage::Reconciling,
            &format!("{} candidates pooled", candidates.len()),
        );
        let reconciler = Reconciler::new(
            self.config.confidence_threshold,
            self.config.page_tolerance,
        );
        let boundaries = reconciler.reconcile(candidates);

        self.transition(
            JobStage::Segmenting,
            &format!("{} boundaries retained", boundaries.len()),
        );
        let builder = SegmentBuilder::new();
        let segments = match builder.build(&boundaries, total_pages, &page_labels) {
            Ok(segments) => segments,
            Err(err) => {
                self.transition(JobStage::Failed, &err.to_string());
                return Err(err.into());
            }
        };

        let oversized = segments
            .iter()
            .filter(|s| s.page_count() > self.config.large_segment_page_ceiling)
            .count();
        self.transition(
            JobStage::LargeSegmentReview,
            &format!("{oversized} segments over the page ceiling"),
        );
        let mut final_segments = Vec::with_capacity(segments.len());
        for segment in segments {
            if segment.page_count() <= self.config.large_segment_page_ceiling {
                final_segments.push(segment);
                continue;
            }
            let reviewed = match self
                .review_segment(&segment, &pages, &page_labels, &mut total_windows, &mut degraded_windows)
                .await
            {
                Ok(reviewed) => reviewed,
                Err(err) => {
                    if err.is_integrity_violation() {
                        self.transition(JobStage::Failed, &err.to_string());
                    }
                    return Err(err);
                }
            };
            match reviewed {
                Some(subdivided) => {
                    for mut sub in subdivided {
                        if sub.page_count() > self.config.large_segment_page_ceiling {
                            sub.anomalies.push(Anomaly::UnverifiedLarge {
                                pages: sub.page_count(),
                            });
                        }
                        final_segments.push(sub);
                    }
                }
                None => {
                    let mut segment = segment;
                    warn!(job = %self.id, segment = segment.id, pages = segment.page_count(),
                        "review pass found no internal boundary, flagging");
                    segment.anomalies.push(Anomaly::UnverifiedLarge {
                        pages: segment.page_count(),
                    });
                    final_segments.push(segment);
                }
            }
        }
        for (index, segment) in final_segments.iter_mut().enumerate() {
            segment.id = index;
        }
        if let Err(err) = verify_partition(&final_segments, total_pages) {
            self.transition(JobStage::Failed, &err.to_string());
            return Err(err.into());
        }
        flag_bates_regressions(&mut final_segments);

        let elapsed = started.elapsed();
        let soft_deadline_exceeded = self
            .config
            .soft_deadline
            .is_some_and(|deadline| elapsed > deadline);
        if soft_deadline_exceeded {
            warn!(job = %self.id, elapsed_ms = elapsed.as_millis() as u64,
                "soft deadline exceeded");
        }
        let flagged_segments = final_segments.iter().filter(|s| s.is_flagged()).count();
        let summary = JobSummary {
            total_pages,
            total_windows,
            total_segments: final_segments.len(),
            flagged_segments,
            degraded_windows,
            elapsed,
            soft_deadline_exceeded,
        };
        self.transition(
            JobStage::Completed,
            &format!(
                "{} segments, {} flagged, {} degraded windows",
                summary.total_segments, summary.flagged_segments, summary.degraded_windows
            ),
        );
        Ok(JobOutput {
            job_id: self.id,
            segments: final_segments,
            summary,
        })
    }

    /// Classify every window concurrently under the permit bound.
    ///
    /// Each task owns its result until the single join barrier; nothing is
    /// shared between tasks, so there is no locking beyond the join.
    async fn dispatch_windows(
        &self,
        windows: &[Window],
        pages: &Arc<Vec<PageContent>>,
    ) -> Result<(Vec<BoundaryCandidate>, usize)> {
        let semaphore = Arc::new(Semaphore::new(self.config.oracle_concurrency));
        let policy = RetryPolicy::new(
            self.config.max_oracle_attempts,
            self.config.retry_base_delay.as_millis() as u64,
            self.config.retry_max_delay.as_millis() as u64,
            self.config.retry_jitter_pct,
        );

        let mut tasks = Vec::with_capacity(windows.len());
        for window in windows.iter().copied() {
            let semaphore = semaphore.clone();
            let oracle = self.oracle.clone();
            let pages = pages.clone();
            let cancel = self.cancel.clone();
            let policy = policy.clone();
            let call_timeout = self.config.oracle_timeout;
            let job_id = self.id;
            tasks.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return (window.id, WindowOutcome::Skipped),
                };
                if cancel.is_cancelled() {
                    return (window.id, WindowOutcome::Skipped);
                }
                let slice = &pages[window.start_page..=window.end_page];
                match classify_window(oracle.as_ref(), &window, slice, &policy, call_timeout).await
                {
                    Ok(candidates) => {
                        debug!(job = %job_id, window = window.id, candidates = candidates.len(),
                            "window classified");
                        (window.id, WindowOutcome::Classified(candidates))
                    }
                    Err(err) => {
                        warn!(job = %job_id, window = window.id, error = %err,
                            "window degraded after retry exhaustion");
                        (window.id, WindowOutcome::Degraded)
                    }
                }
            }));
        }

        let joined = futures::future::join_all(tasks).await;
        if self.cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let mut candidates = Vec::new();
        let mut degraded = 0;
        for result in joined {
            let (_window_id, outcome) =
                result.map_err(|err| EngineError::TaskJoin(err.to_string()))?;
            match outcome {
                WindowOutcome::Classified(mut found) => candidates.append(&mut found),
                WindowOutcome::Degraded => degraded += 1,
                // only reachable under cancellation, which returned above
                WindowOutcome::Skipped => {}
            }
        }
        Ok((candidates, degraded))
    }

    /// One finer-grained pass over an oversized segment.
    ///
    /// Returns the subdivided segments, or `None` when the pass found no
    /// internal boundary. Results of this pass are never re-escalated.
    async fn review_segment(
        &self,
        segment: &Segment,
        pages: &Arc<Vec<PageContent>>,
        page_labels: &[Option<BatesLabel>],
        total_windows: &mut usize,
        degraded_windows: &mut usize,
    ) -> Result<Option<Vec<Segment>>> {
        let span_pages = segment.page_count();
        let mut windows = plan_windows(
            span_pages,
            self.config.review_window_size,
            self.config.review_window_overlap,
        )?;
        for window in &mut windows {
            window.start_page += segment.start_page;
            window.end_page += segment.start_page;
        }
        debug!(job = %self.id, segment = segment.id, windows = windows.len(),
            "review pass over pages {}..={}", segment.start_page, segment.end_page);
        *total_windows += windows.len();

        let (candidates, degraded) = self.dispatch_windows(&windows, pages).await?;
        *degraded_windows += degraded;

        // Reconcile in segment-local coordinates so the forced page-0
        // boundary lands on the segment's own first page.
        let local: Vec<BoundaryCandidate> = candidates
            .into_iter()
            .filter(|c| c.page_index >= segment.start_page && c.page_index <= segment.end_page)
            .map(|mut c| {
                c.page_index -= segment.start_page;
                c
            })
            .collect();
        let reconciler = Reconciler::new(
            self.config.confidence_threshold,
            self.config.page_tolerance,
        );
        let boundaries = reconciler.reconcile(local);
        if boundaries.len() < 2 {
            return Ok(None);
        }

        let local_labels = &page_labels[segment.start_page..=segment.end_page];
        let mut subdivided =
            SegmentBuilder::new().build(&boundaries, span_pages, local_labels)?;
        for sub in &mut subdivided {
            sub.start_page += segment.start_page;
            sub.end_page += segment.start_page;
        }
        // The opening sub-segment is still the document the original
        // boundary described; later ones are newly discovered.
        if let Some(first) = subdivided.first_mut() {
            first.kind = segment.kind;
            first.title = segment.title.clone();
            first.confidence = segment.confidence;
            let mut carried = segment.anomalies.clone();
            carried.append(&mut first.anomalies);
            first.anomalies = carried;
        }
        Ok(Some(subdivided))
    }

    fn transition(&self, stage: JobStage, detail: &str) {
        info!(job = %self.id, stage = %stage, detail, "stage transition");
        self.progress.report(self.id, stage, detail);
    }
}

/// Run one window's classification with per-attempt timeout and bounded
/// backoff. Permanent errors degrade immediately; transient ones retry.
async fn classify_window(
    oracle: &dyn BoundaryOracle,
    window: &Window,
    pages: &[PageContent],
    policy: &RetryPolicy,
    call_timeout: Duration,
) -> std::result::Result<Vec<BoundaryCandidate>, OracleError> {
    policy
        .retry_async(
            |attempt| {
                if attempt > 0 {
                    debug!(window = window.id, attempt, "retrying classification");
                }
                let call = oracle.classify(window, pages);
                async move {
                    match timeout(call_timeout, call).await {
                        Ok(outcome) => outcome,
                        Err(_) => Err(OracleError::Timeout),
                    }
                }
            },
            OracleError::is_transient,
        )
        .await
}
