//! tilesift-tissue - Tissue/background decisions for slide tiling
//!
//! The decision logic of a tiling run, free of any file I/O:
//!
//! - [`BackgroundColorResolver`]: background colors from mask borders and corners
//! - [`consolidate_mask`]: fold background variants into one canonical color
//! - [`TileGrid`]: row-major tile layout with clipped edge tiles
//! - [`TissueClassifier`]: keep/discard from a mask window and a [`Threshold`]
//!
//! # Example
//!
//! ```
//! use tilesift_core::{Raster, Rgb};
//! use tilesift_tissue::{
//!     BackgroundColorResolver, Threshold, TileGrid, TissueClassifier, consolidate_mask,
//! };
//!
//! let mask = Raster::new_filled(64, 64, Rgb::WHITE).unwrap();
//! let resolver =
//!     BackgroundColorResolver::new("1111".parse().unwrap(), "0000".parse().unwrap(), 4).unwrap();
//! let background = resolver.resolve(&mask).unwrap();
//! let (mask, _) = consolidate_mask(mask, &background);
//!
//! let classifier = TissueClassifier::new(background.canonical(), Threshold::new(0.5).unwrap());
//! let grid = TileGrid::new(64, 64, 32).unwrap();
//! let kept = grid
//!     .iter()
//!     .filter(|t| classifier.classify_region(&mask, &t.rect).unwrap().decision.is_keep())
//!     .count();
//! assert_eq!(kept, 0);
//! ```

pub mod background;
pub mod classify;
mod error;
pub mod grid;
pub mod region;

pub use background::{Background, BackgroundColorResolver, consolidate_mask};
pub use classify::{Classification, Threshold, TileDecision, TissueClassifier};
pub use error::{TissueError, TissueResult};
pub use grid::{TileGrid, TileIter, TileNamer, TilePlacement, dimension_label};
pub use region::{BorderFlags, CornerFlags, SampleRegion, enabled_regions};
