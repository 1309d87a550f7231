//! Slide access
//!
//! Tiles are read through [`SlideReader`], which takes `&self` so several
//! workers can read regions of one open slide at the same time. The slide
//! handle is released when the reader is dropped.

use std::path::{Path, PathBuf};
use tilesift_core::{Raster, Rect};
use tilesift_io::{IoError, IoResult};

/// Random rectangular reads from a full-resolution slide.
pub trait SlideReader: Send + Sync {
    /// Slide size in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// RGB pixels of `rect`, which lies inside the slide.
    fn read_region(&self, rect: &Rect) -> IoResult<Raster>;
}

/// A slide decoded fully into memory from any supported image file.
#[derive(Debug, Clone)]
pub struct RasterSlide {
    path: PathBuf,
    raster: Raster,
}

impl RasterSlide {
    /// Decode the slide at `path`.
    pub fn open(path: impl AsRef<Path>) -> IoResult<Self> {
        let path = path.as_ref();
        let raster = tilesift_io::read_image(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            raster,
        })
    }

    /// Wrap an already decoded raster.
    pub fn from_raster(raster: Raster) -> Self {
        Self {
            path: PathBuf::new(),
            raster,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SlideReader for RasterSlide {
    fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    fn read_region(&self, rect: &Rect) -> IoResult<Raster> {
        rect.check_within(self.raster.width(), self.raster.height())?;
        self.raster.clip_rectangle(rect).map_err(IoError::from)
    }
}
