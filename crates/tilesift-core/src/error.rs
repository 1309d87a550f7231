//! Error types for tilesift-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// tilesift-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Pixel coordinate outside the raster
    #[error("pixel ({x}, {y}) outside {width}x{height} raster")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Rectangle does not lie inside the raster
    #[error("region {x},{y} {w}x{h} outside {width}x{height} raster")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        width: u32,
        height: u32,
    },

    /// Image dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Raw buffer length does not match the stated dimensions
    #[error("buffer length {actual} does not match {expected} bytes")]
    BufferLength { expected: usize, actual: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
