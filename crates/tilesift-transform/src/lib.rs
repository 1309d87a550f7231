//! tilesift-transform - Raster resampling
//!
//! Resizes rasters to an exact size or by a factor with one of three
//! methods:
//!
//! - Sampling: nearest neighbor, exact for label images such as masks
//! - Linear: bilinear interpolation on pixel centers
//! - AreaMap: coverage-weighted box averaging, for anti-aliased reduction

mod error;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use scale::{ScaleMethod, scale, scale_to_size};
