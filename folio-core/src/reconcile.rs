//! Boundary reconciliation across windows
//!
//! Overlapping windows observe the same physical transitions independently,
//! so the raw candidate pool contains duplicates, near-duplicates, and
//! contradictions. Reconciliation:
//!
//! 1. Groups candidates whose page indices sit within a small tolerance of
//!    each other (two windows reporting the same transition at page 30 and
//!    page 31 are one event).
//! 2. Resolves each group optimistically: a transition seen confidently by
//!    even one window is kept at that confidence, with type and title taken
//!    from the strongest observation. Confidence ties go to the earliest
//!    window.
//! 3. Drops resolved boundaries below the confidence threshold, preferring
//!    under-segmentation over false splits.
//! 4. Forces the implicit boundary at page 0, so total oracle failure still
//!    yields one whole-document segment.

use crate::types::{BoundaryCandidate, ReconciledBoundary};

/// Merges raw per-window candidates into a globally ordered boundary list
#[derive(Debug, Clone)]
pub struct Reconciler {
    confidence_threshold: f64,
    page_tolerance: usize,
}

impl Reconciler {
    /// Create a reconciler with the given retention threshold and grouping
    /// tolerance (in pages)
    pub fn new(confidence_threshold: f64, page_tolerance: usize) -> Self {
        Self {
            confidence_threshold,
            page_tolerance,
        }
    }

    /// Reduce the pooled candidates to deduplicated, ordered boundaries
    pub fn reconcile(&self, mut candidates: Vec<BoundaryCandidate>) -> Vec<ReconciledBoundary> {
        candidates.sort_by(|a, b| {
            a.page_index
                .cmp(&b.page_index)
                .then(a.window_id.cmp(&b.window_id))
        });

        let mut boundaries: Vec<ReconciledBoundary> = Vec::new();
        let mut group: Vec<BoundaryCandidate> = Vec::new();

        for candidate in candidates {
            let chained = group
                .last()
                .is_some_and(|prev| candidate.page_index - prev.page_index <= self.page_tolerance);
            if !chained && !group.is_empty() {
                if let Some(resolved) = self.resolve(&group) {
                    boundaries.push(resolved);
                }
                group.clear();
            }
            group.push(candidate);
        }
        if !group.is_empty() {
            if let Some(resolved) = self.resolve(&group) {
                boundaries.push(resolved);
            }
        }

        if boundaries.first().is_none_or(|b| b.page_index != 0) {
            boundaries.insert(0, ReconciledBoundary::document_start());
        }
        boundaries.sort_by_key(|b| b.page_index);
        boundaries
    }

    /// Resolve one proximity group to a boundary, or drop it at the threshold
    fn resolve(&self, group: &[BoundaryCandidate]) -> Option<ReconciledBoundary> {
        let best = group.iter().fold(&group[0], |best, candidate| {
            if candidate.confidence > best.confidence
                || (candidate.confidence == best.confidence && candidate.window_id < best.window_id)
            {
                candidate
            } else {
                best
            }
        });

        let confidence = group.iter().fold(0.0_f64, |acc, c| acc.max(c.confidence));
        if confidence < self.confidence_threshold {
            return None;
        }

        // The label must come from a candidate that actually read one,
        // which is not necessarily the strongest member.
        let bates_start = group
            .iter()
            .filter(|c| c.bates_start.is_some())
            .fold(None::<&BoundaryCandidate>, |strongest, candidate| {
                match strongest {
                    Some(s)
                        if s.confidence > candidate.confidence
                            || (s.confidence == candidate.confidence
                                && s.window_id < candidate.window_id) =>
                    {
                        Some(s)
                    }
                    _ => Some(candidate),
                }
            })
            .and_then(|c| c.bates_start.clone());

        Some(ReconciledBoundary {
            page_index: best.page_index,
            confidence,
            kind: best.kind,
            title: best.title.clone(),
            bates_start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bates::BatesLabel;
    use crate::types::DocumentKind;

    fn candidate(window_id: usize, page_index: usize, confidence: f64) -> BoundaryCandidate {
        BoundaryCandidate {
            window_id,
            page_index,
            confidence,
            kind: DocumentKind::Correspondence,
            title: None,
            bates_start: None,
        }
    }

    #[test]
    fn empty_pool_yields_document_start_only() {
        let reconciler = Reconciler::new(0.7, 1);
        let boundaries = reconciler.reconcile(Vec::new());
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].page_index, 0);
        assert_eq!(boundaries[0].kind, DocumentKind::Unknown);
    }

    #[test]
    fn duplicate_observations_collapse_to_one() {
        let reconciler = Reconciler::new(0.7, 1);
        let boundaries = reconciler.reconcile(vec![
            candidate(1, 30, 0.8),
            candidate(2, 30, 0.75),
        ]);
        // page 0 forced, plus exactly one merged boundary
        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[1].page_index, 30);
        assert_eq!(boundaries[1].confidence, 0.8);
    }

    #[test]
    fn off_by_one_observations_collapse_to_one() {
        let reconciler = Reconciler::new(0.7, 1);
        let boundaries = reconciler.reconcile(vec![
            candidate(1, 30, 0.72),
            candidate(2, 31, 0.9),
        ]);
        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[1].page_index, 31);
        assert_eq!(boundaries[1].confidence, 0.9);
    }

    #[test]
    fn merged_confidence_is_the_maximum() {
        let reconciler = Reconciler::new(0.7, 1);
        let boundaries = reconciler.reconcile(vec![
            candidate(1, 30, 0.65),
            candidate(2, 30, 0.75),
        ]);
        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[1].confidence, 0.75);
    }

    #[test]
    fn threshold_is_inclusive() {
        let reconciler = Reconciler::new(0.7, 1);

        let kept = reconciler.reconcile(vec![candidate(0, 40, 0.7)]);
        assert_eq!(kept.len(), 2);

        let dropped = reconciler.reconcile(vec![candidate(0, 40, 0.7 - 1e-9)]);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].page_index, 0);
    }

    #[test]
    fn tied_confidence_takes_earliest_window() {
        let reconciler = Reconciler::new(0.5, 1);
        let mut a = candidate(3, 30, 0.8);
        a.kind = DocumentKind::Invoice;
        let mut b = candidate(1, 30, 0.8);
        b.kind = DocumentKind::Motion;

        let boundaries = reconciler.reconcile(vec![a, b]);
        assert_eq!(boundaries[1].kind, DocumentKind::Motion);
    }

    #[test]
    fn bates_comes_from_a_candidate_that_read_one() {
        let reconciler = Reconciler::new(0.5, 1);
        let strongest = candidate(1, 30, 0.9);
        let mut weaker = candidate(2, 30, 0.6);
        weaker.bates_start = BatesLabel::parse("ABC000300");

        let boundaries = reconciler.reconcile(vec![strongest, weaker]);
        assert_eq!(
            boundaries[1].bates_start.as_ref().map(|l| l.number),
            Some(300)
        );
    }

    #[test]
    fn surviving_page_zero_candidate_is_not_duplicated() {
        let reconciler = Reconciler::new(0.7, 1);
        let mut first = candidate(0, 0, 0.95);
        first.kind = DocumentKind::Motion;

        let boundaries = reconciler.reconcile(vec![first, candidate(1, 30, 0.8)]);
        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[0].page_index, 0);
        assert_eq!(boundaries[0].kind, DocumentKind::Motion);
    }

    #[test]
    fn sub_threshold_page_zero_is_replaced_by_implicit_start() {
        let reconciler = Reconciler::new(0.7, 1);
        let boundaries = reconciler.reconcile(vec![candidate(0, 0, 0.2)]);
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].kind, DocumentKind::Unknown);
        assert_eq!(boundaries[0].confidence, 1.0);
    }

    #[test]
    fn distinct_transitions_stay_distinct() {
        let reconciler = Reconciler::new(0.7, 1);
        let boundaries = reconciler.reconcile(vec![
            candidate(0, 10, 0.8),
            candidate(0, 20, 0.8),
            candidate(1, 21, 0.85),
        ]);
        let pages: Vec<_> = boundaries.iter().map(|b| b.page_index).collect();
        assert_eq!(pages, vec![0, 10, 21]);
    }
}
