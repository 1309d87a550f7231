//! tilesift-pipeline - End-to-end slide tiling
//!
//! Takes a segmentation mask and a full-resolution slide, and for every
//! tile of a row-major grid decides whether it holds enough tissue. Kept
//! tiles can be written as JPEG patches; an overview thumbnail marks them
//! with a cross; `tile_selection.tsv` lists every tile with its decision.
//!
//! ```no_run
//! use tilesift_pipeline::{CancelToken, PatchPipeline, PipelineConfig};
//!
//! let config = PipelineConfig {
//!     sample_id: "S1".to_string(),
//!     svs_fname: "S1.tif".into(),
//!     ..PipelineConfig::default()
//! };
//! let summary = PatchPipeline::new(config)?.run(&CancelToken::new())?;
//! println!("kept {} of {} tiles", summary.kept, summary.tile_count);
//! # Ok::<(), tilesift_pipeline::PipelineError>(())
//! ```

pub mod cancel;
pub mod config;
mod error;
pub mod patches;
pub mod report;
pub mod run;
pub mod slide;
pub mod thumbnail;

pub use cancel::CancelToken;
pub use config::{MaskResize, PipelineConfig};
pub use error::{PipelineError, PipelineResult};
pub use patches::PatchWriter;
pub use report::{ClassificationRecord, write_report, write_report_file};
pub use run::{PatchPipeline, RunSummary};
pub use slide::{RasterSlide, SlideReader};
pub use thumbnail::{ThumbnailBuilder, ThumbnailLayout, write_thumbnail};
