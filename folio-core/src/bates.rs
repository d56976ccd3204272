//! Bates label parsing and range scanning
//!
//! A Bates stamp is a series prefix followed by a zero-padded sequence
//! number, printed on each page of a production (`ABC000123`, `DEF-00045`).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A printed Bates stamp, split into series prefix and sequence number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatesLabel {
    /// Series prefix, e.g. `ABC`
    pub prefix: String,
    /// Sequence number within the series
    pub number: u64,
    /// Digit width of the printed number, for round-tripping the padding
    pub width: usize,
}

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z][A-Za-z0-9]*?)[-_ ]?([0-9]{3,})$").expect("static pattern")
    })
}

impl BatesLabel {
    /// Parse a printed label. Accepts `-`, `_`, or a space between prefix
    /// and number; requires an alphabetic-led prefix and at least 3 digits.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = label_pattern().captures(raw.trim())?;
        let prefix = caps.get(1)?.as_str().to_string();
        let digits = caps.get(2)?.as_str();
        let number = digits.parse().ok()?;
        Some(Self {
            prefix,
            number,
            width: digits.len(),
        })
    }

    /// Whether two labels belong to the same series
    pub fn same_series(&self, other: &Self) -> bool {
        self.prefix.eq_ignore_ascii_case(&other.prefix)
    }

    /// Absolute distance between sequence numbers, if the series match
    pub fn distance(&self, other: &Self) -> Option<u64> {
        self.same_series(other)
            .then(|| self.number.abs_diff(other.number))
    }
}

impl fmt::Display for BatesLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:0width$}", self.prefix, self.number, width = self.width)
    }
}

/// Observed Bates span of a segment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatesRange {
    /// First printed label inside the span
    pub start: Option<BatesLabel>,
    /// Last printed label inside the span
    pub end: Option<BatesLabel>,
}

impl BatesRange {
    /// True when no label was observed anywhere in the span
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Scan per-page labels for the first and last printed label
pub fn scan_range(page_labels: &[Option<BatesLabel>]) -> BatesRange {
    let mut range = BatesRange::default();
    for label in page_labels.iter().flatten() {
        if range.start.is_none() {
            range.start = Some(label.clone());
        }
        range.end = Some(label.clone());
    }
    range
}
