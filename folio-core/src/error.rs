//! Error types for the pure segmentation model

use thiserror::Error;

/// Errors produced by the core model
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected window geometry or thresholds
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The constructed segment list is not a gap-free partition
    ///
    /// This is the only structural failure: it means the output cannot be
    /// trusted and the surrounding job must abort.
    #[error("segmentation integrity violated: {0}")]
    IntegrityViolation(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
