//! Page source seam
//!
//! The engine never parses the production file itself; it consumes page
//! text, layout, and detected Bates stamps through this trait.

use folio_core::BatesLabel;
use thiserror::Error;

/// Extracted content of one page
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Raw page text
    pub text: String,
    /// Physical page dimensions, when the extractor reports them
    pub layout: Option<PageLayout>,
    /// Bates stamp detected on the page, when one was printed
    pub bates_label: Option<BatesLabel>,
}

impl PageContent {
    /// Content for a page whose extraction failed: no text, no label
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Page width
    pub width: f64,
    /// Page height
    pub height: f64,
}

/// Errors from the page source
#[derive(Error, Debug)]
pub enum SourceError {
    /// Requested page index past the end of the production
    #[error("page {index} out of range, production has {total} pages")]
    OutOfRange {
        /// Requested page index
        index: usize,
        /// Total page count of the production
        total: usize,
    },

    /// The page exists but could not be read
    #[error("failed to read page {index}: {reason}")]
    Unreadable {
        /// Page index that failed
        index: usize,
        /// Extractor-reported reason
        reason: String,
    },
}

/// Supplies page content on demand
pub trait PageSource: Send + Sync {
    /// Total number of pages in the production
    fn page_count(&self) -> usize;

    /// Content of one page by index
    fn page(&self, index: usize) -> Result<PageContent, SourceError>;
}
