//! Error types for tilesift-transform

use thiserror::Error;

/// Errors that can occur during resampling
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] tilesift_core::Error),

    /// Invalid scale factor
    #[error("invalid scale factor: {0}")]
    InvalidScaleFactor(String),

    /// Invalid target size
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
