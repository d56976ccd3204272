//! Segment construction from reconciled boundaries
//!
//! Turns the ordered boundary list into a contiguous partition of the page
//! range, scans printed Bates labels into each segment, and verifies the
//! structural invariant before handing segments on.

use crate::{
    bates::{scan_range, BatesLabel},
    error::{CoreError, Result},
    types::{Anomaly, ReconciledBoundary, Segment},
};

/// Builds the validated segment partition
#[derive(Debug, Clone)]
pub struct SegmentBuilder {
    bates_number_tolerance: u64,
}

impl Default for SegmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentBuilder {
    /// Create a builder with the default Bates agreement tolerance
    pub fn new() -> Self {
        Self {
            bates_number_tolerance: 1,
        }
    }

    /// Construct segments from ordered boundaries over `total_pages` pages.
    ///
    /// `page_labels` holds the printed label detected on each page (index =
    /// page index); it drives the observed `bates_range` and the
    /// cross-checks against oracle-reported labels. Label disagreements are
    /// recorded as anomalies; a broken partition is the one fatal error.
    pub fn build(
        &self,
        boundaries: &[ReconciledBoundary],
        total_pages: usize,
        page_labels: &[Option<BatesLabel>],
    ) -> Result<Vec<Segment>> {
        if boundaries.is_empty() {
            return Err(CoreError::IntegrityViolation(
                "no boundaries to build from".to_string(),
            ));
        }

        let mut segments = Vec::with_capacity(boundaries.len());
        for (i, boundary) in boundaries.iter().enumerate() {
            let start_page = boundary.page_index;
            let end_page = match boundaries.get(i + 1) {
                Some(next) => next.page_index.wrapping_sub(1),
                None => total_pages - 1,
            };
            if start_page > end_page || end_page >= total_pages {
                return Err(CoreError::IntegrityViolation(format!(
                    "boundary at page {start_page} produces span [{start_page}, {end_page}] \
                     outside [0, {}]",
                    total_pages - 1
                )));
            }

            let span_end = (end_page + 1).min(page_labels.len());
            let span_labels = page_labels.get(start_page..span_end).unwrap_or(&[]);
            let bates_range = scan_range(span_labels);

            let mut anomalies = Vec::new();
            if let (Some(reported), Some(observed)) =
                (&boundary.bates_start, &bates_range.start)
            {
                let agrees = reported
                    .distance(observed)
                    .is_some_and(|d| d <= self.bates_number_tolerance);
                if !agrees {
                    anomalies.push(Anomaly::BatesMismatch {
                        reported: reported.clone(),
                        observed: observed.clone(),
                    });
                }
            }

            segments.push(Segment {
                id: segments.len(),
                start_page,
                end_page,
                kind: boundary.kind,
                title: boundary.title.clone(),
                confidence: boundary.confidence,
                bates_range,
                anomalies,
            });
        }

        verify_partition(&segments, total_pages)?;
        Ok(segments)
    }
}

/// Mark segments whose observed labels run backwards within a series.
///
/// Bates numbers should be non-decreasing across a production; a regression
/// is reviewer signal, never fatal. Called once on the final segment list,
/// after any large-segment subdivision has settled the spans.
pub fn flag_bates_regressions(segments: &mut [Segment]) {
    for i in 1..segments.len() {
        let previous_end = segments[i - 1].bates_range.end.clone();
        let observed_start = segments[i].bates_range.start.clone();
        if let (Some(prev), Some(cur)) = (previous_end, observed_start) {
            if prev.same_series(&cur) && cur.number < prev.number {
                segments[i].anomalies.push(Anomaly::BatesRegression {
                    previous_end: prev,
                    observed_start: cur,
                });
            }
        }
    }
}

/// Check that `segments` is a contiguous, gap-free partition of
/// `[0, total_pages - 1]`.
pub fn verify_partition(segments: &[Segment], total_pages: usize) -> Result<()> {
    let first = segments.first().ok_or_else(|| {
        CoreError::IntegrityViolation("segment list is empty".to_string())
    })?;
    if first.start_page != 0 {
        return Err(CoreError::IntegrityViolation(format!(
            "first segment starts at page {} instead of 0",
            first.start_page
        )));
    }

    let mut expected_start = 0;
    for segment in segments {
        if segment.start_page != expected_start {
            return Err(CoreError::IntegrityViolation(format!(
                "segment {} starts at page {} but page {} was expected",
                segment.id, segment.start_page, expected_start
            )));
        }
        if segment.end_page < segment.start_page {
            return Err(CoreError::IntegrityViolation(format!(
                "segment {} has inverted span [{}, {}]",
                segment.id, segment.start_page, segment.end_page
            )));
        }
        expected_start = segment.end_page + 1;
    }

    if expected_start != total_pages {
        return Err(CoreError::IntegrityViolation(format!(
            "segments end at page {} but the production has {} pages",
            expected_start - 1,
            total_pages
        )));
    }
    Ok(())
}
