//! Tilesift - tissue tile selection for whole-slide images
//!
//! Cuts a slide into a grid of square patches and keeps the ones that
//! hold enough tissue, judged against a low-resolution segmentation mask.
//!
//! # Overview
//!
//! - Raster containers, rectangles and color counting (core)
//! - Image I/O (PNM, PNG, JPEG, TIFF)
//! - Resampling (nearest, bilinear, area averaging)
//! - Background identification, tile grids and tissue classification
//! - The tiling pipeline: patches, crossed thumbnail and TSV report
//!
//! # Example
//!
//! ```
//! use tilesift::{Raster, Rect, Rgb};
//! use tilesift::tissue::{Threshold, TissueClassifier};
//!
//! let mask = Raster::new_filled(4, 4, Rgb::WHITE).unwrap();
//! let classifier = TissueClassifier::new(Rgb::WHITE, Threshold::new(0.5).unwrap());
//! let c = classifier.classify_region(&mask, &Rect::new(0, 0, 4, 4)).unwrap();
//! assert!(!c.decision.is_keep());
//! ```

// Re-export core types (primary data structures used everywhere)
pub use tilesift_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use tilesift_io as io;
pub use tilesift_pipeline as pipeline;
pub use tilesift_tissue as tissue;
pub use tilesift_transform as transform;
