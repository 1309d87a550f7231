//! Rectangle clipping and pasting
//!
//! Extracting rectangular sub-regions from rasters and placing rasters
//! onto larger canvases.

use super::{Raster, RasterMut};
use crate::error::{Error, Result};
use crate::rect::Rect;

impl Raster {
    /// Extract a rectangular sub-region from the image.
    ///
    /// Creates a new image containing the specified rectangle. If the
    /// rectangle extends beyond the image bounds, it is clipped to the
    /// valid region.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The requested width or height is 0
    /// - The rectangle origin is outside the image bounds
    ///
    /// # Examples
    ///
    /// ```
    /// use tilesift_core::{Raster, Rect};
    ///
    /// let raster = Raster::new(100, 80).unwrap();
    /// let clipped = raster.clip_rectangle(&Rect::new(80, 60, 50, 50)).unwrap();
    /// assert_eq!(clipped.width(), 20);   // clipped: 100 - 80
    /// assert_eq!(clipped.height(), 20);  // clipped: 80 - 60
    /// ```
    pub fn clip_rectangle(&self, region: &Rect) -> Result<Raster> {
        if region.is_empty() {
            return Err(Error::InvalidParameter(format!(
                "clip rectangle has zero dimension: {}x{}",
                region.w, region.h
            )));
        }

        let (src_w, src_h) = self.dimensions();
        if region.x >= src_w || region.y >= src_h {
            return Err(Error::RegionOutOfBounds {
                x: region.x,
                y: region.y,
                w: region.w,
                h: region.h,
                width: src_w,
                height: src_h,
            });
        }

        let clip_w = region.w.min(src_w - region.x);
        let clip_h = region.h.min(src_h - region.y);

        let mut data = Vec::with_capacity(clip_w as usize * clip_h as usize);
        let x0 = region.x as usize;
        for y in region.y..region.y + clip_h {
            data.extend_from_slice(&self.row_data(y)[x0..x0 + clip_w as usize]);
        }

        let mut out = Raster::from_data(clip_w, clip_h, data).into_mut();
        out.set_informat(self.informat());
        Ok(out.into())
    }
}

impl RasterMut {
    /// Copy `src` onto this raster with its top-left corner at `(x, y)`.
    ///
    /// Parts of `src` falling outside this raster are dropped. Returns the
    /// destination rectangle actually written, or `None` if nothing
    /// overlapped.
    pub fn paste(&mut self, src: &Raster, x: u32, y: u32) -> Option<Rect> {
        let (w, h) = self.dimensions();
        let target = Rect::new(x, y, src.width(), src.height()).intersect(&Rect::from_size(w, h))?;

        let run = target.w as usize;
        let x0 = target.x as usize;
        for dy in 0..target.h {
            let src_row = &src.row_data(dy)[..run];
            self.row_data_mut(target.y + dy)[x0..x0 + run].copy_from_slice(src_row);
        }
        Some(target)
    }
}
