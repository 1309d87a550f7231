//! Error types for tilesift-tissue

use thiserror::Error;

/// Errors raised while resolving background, planning tiles or
/// classifying windows
#[derive(Debug, Error)]
pub enum TissueError {
    /// Core library error (e.g. a window outside the mask)
    #[error("core error: {0}")]
    Core(#[from] tilesift_core::Error),

    /// A border or corner flag string is malformed
    #[error("invalid flag string {0:?}: expected 4 characters of '0' or '1'")]
    InvalidFlags(String),

    /// Every border and corner flag is disabled
    #[error("no border or corner sample region is enabled")]
    NoSampleRegions,

    /// Sampling thickness must be positive
    #[error("sampling thickness must be positive")]
    InvalidLines,

    /// Threshold outside [0, 1]
    #[error("threshold {0} outside [0, 1]")]
    InvalidThreshold(f64),

    /// Patch size must be positive
    #[error("patch size must be positive")]
    InvalidPatchSize,

    /// Slide dimensions must be positive
    #[error("invalid slide dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Result type for tissue operations
pub type TissueResult<T> = Result<T, TissueError>;
