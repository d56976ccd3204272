//! Shared data model for production segmentation

use crate::bates::{BatesLabel, BatesRange};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical document categories recognized in a production
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Motion or brief filed with a court
    Motion,
    /// Deposition transcript
    Deposition,
    /// Invoice or billing record
    Invoice,
    /// Letter or other correspondence
    Correspondence,
    /// Email message or thread
    Email,
    /// Contract or agreement
    Contract,
    /// Order issued by a court
    CourtOrder,
    /// Pleading (complaint, answer, etc.)
    Pleading,
    /// Marked exhibit
    Exhibit,
    /// Expert or business report
    Report,
    /// Unclassified content
    #[default]
    Unknown,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Motion => write!(f, "motion"),
            Self::Deposition => write!(f, "deposition"),
            Self::Invoice => write!(f, "invoice"),
            Self::Correspondence => write!(f, "correspondence"),
            Self::Email => write!(f, "email"),
            Self::Contract => write!(f, "contract"),
            Self::CourtOrder => write!(f, "court_order"),
            Self::Pleading => write!(f, "pleading"),
            Self::Exhibit => write!(f, "exhibit"),
            Self::Report => write!(f, "report"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// An inclusive page range submitted to the oracle in one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Position of this window in the schedule
    pub id: usize,
    /// First page covered (inclusive)
    pub start_page: usize,
    /// Last page covered (inclusive)
    pub end_page: usize,
}

impl Window {
    /// Number of pages covered
    pub fn page_count(&self) -> usize {
        self.end_page - self.start_page + 1
    }

    /// Whether the window covers the given page
    pub fn contains(&self, page: usize) -> bool {
        (self.start_page..=self.end_page).contains(&page)
    }
}

/// A raw boundary proposal from one oracle call
///
/// Untrusted: the oracle may miss real boundaries, invent false ones, or
/// mis-score confidence. Candidates only become meaningful after
/// reconciliation across windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCandidate {
    /// Window the proposal came from
    pub window_id: usize,
    /// Page where a new document is claimed to start
    pub page_index: usize,
    /// Oracle confidence in [0, 1]
    pub confidence: f64,
    /// Claimed type of the document starting here
    pub kind: DocumentKind,
    /// Claimed document title, if the oracle read one
    pub title: Option<String>,
    /// Bates label the oracle read on the starting page, if any
    pub bates_start: Option<BatesLabel>,
}

/// One physical document transition, deduplicated across windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledBoundary {
    /// Page where the new document starts
    pub page_index: usize,
    /// Best confidence observed for this transition
    pub confidence: f64,
    /// Document type from the strongest observation
    pub kind: DocumentKind,
    /// Title from the strongest observation
    pub title: Option<String>,
    /// Printed label actually read at the transition, if any window saw one
    pub bates_start: Option<BatesLabel>,
}

impl ReconciledBoundary {
    /// The implicit boundary at page 0: every production starts a document
    /// there whether or not any window reported it.
    pub fn document_start() -> Self {
        Self {
            page_index: 0,
            confidence: 1.0,
            kind: DocumentKind::Unknown,
            title: None,
            bates_start: None,
        }
    }
}

/// A non-fatal data-quality finding attached to a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Anomaly {
    /// Oracle-claimed starting label disagrees with the printed one
    BatesMismatch {
        /// Label the oracle reported at the boundary
        reported: BatesLabel,
        /// Label actually printed on the first page
        observed: BatesLabel,
    },
    /// Observed labels run backwards relative to the previous segment
    BatesRegression {
        /// Last printed label of the preceding segment
        previous_end: BatesLabel,
        /// First printed label of this segment
        observed_start: BatesLabel,
    },
    /// Oversized segment that a finer-grained review could not subdivide
    UnverifiedLarge {
        /// Page count of the segment
        pages: usize,
    },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatesMismatch { reported, observed } => {
                write!(f, "bates mismatch: oracle reported {reported}, page shows {observed}")
            }
            Self::BatesRegression {
                previous_end,
                observed_start,
            } => {
                write!(
                    f,
                    "bates regression: starts at {observed_start} after previous segment ended at {previous_end}"
                )
            }
            Self::UnverifiedLarge { pages } => {
                write!(f, "unverified large segment spanning {pages} pages")
            }
        }
    }
}

/// One logical document within the production
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Positional id within the final segment list
    pub id: usize,
    /// First page (inclusive)
    pub start_page: usize,
    /// Last page (inclusive)
    pub end_page: usize,
    /// Classified document type
    pub kind: DocumentKind,
    /// Document title, when one was read
    pub title: Option<String>,
    /// Confidence inherited from the opening boundary
    pub confidence: f64,
    /// Printed label span observed on the segment's pages
    pub bates_range: BatesRange,
    /// Non-fatal findings for reviewer attention
    pub anomalies: Vec<Anomaly>,
}

impl Segment {
    /// Number of pages in the segment
    pub fn page_count(&self) -> usize {
        self.end_page - self.start_page + 1
    }

    /// Whether the segment carries any anomaly
    pub fn is_flagged(&self) -> bool {
        !self.anomalies.is_empty()
    }
}
