//! Error types for tilesift-pipeline

use std::path::PathBuf;
use thiserror::Error;
use tilesift_io::IoError;

/// Errors that abort a tiling run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid configuration, reported before any file is touched
    #[error("configuration error: {0}")]
    Config(String),

    /// The mask or slide could not be read
    #[error("cannot read input {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// Reading or writing one tile failed after all retries
    #[error("tile {index} at ({x}, {y}) failed: {source}")]
    Tile {
        index: usize,
        x: u32,
        y: u32,
        #[source]
        source: IoError,
    },

    /// The report, thumbnail or an output directory could not be written
    #[error("cannot write output {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// The run was cancelled before every tile was processed
    #[error("run cancelled after {completed} tiles")]
    Cancelled { completed: usize },

    /// Background inference, grid planning or classification error
    #[error("tissue error: {0}")]
    Tissue(#[from] tilesift_tissue::TissueError),

    /// Mask resampling or thumbnail reduction error
    #[error("transform error: {0}")]
    Transform(#[from] tilesift_transform::TransformError),
}

impl PipelineError {
    pub(crate) fn output(path: impl Into<PathBuf>, source: impl Into<IoError>) -> Self {
        Self::Output {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
