//! API error types

use folio_engine::EngineError;
use thiserror::Error;

/// API-level errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejected configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Engine layer error
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
