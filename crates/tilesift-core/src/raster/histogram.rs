//! Color counting
//!
//! Exact-color statistics over whole rasters or rectangular windows:
//! matching-pixel counts, the set of distinct colors in a region and
//! in-place color replacement.

use super::{PARALLEL_THRESHOLD, Raster, RasterMut};
use crate::color::Rgb;
use crate::error::Result;
use crate::rect::Rect;
use rayon::prelude::*;
use std::collections::BTreeSet;

fn count_in_row(row: &[u32], word: u32) -> u64 {
    row.iter().filter(|&&p| p == word).count() as u64
}

impl Raster {
    /// Count pixels whose color equals `color`.
    ///
    /// Large rasters are reduced row-parallel.
    ///
    /// ```
    /// use tilesift_core::{Raster, Rgb};
    ///
    /// let mut m = Raster::new(4, 4).unwrap().to_mut();
    /// m.set_rgb(0, 0, Rgb::WHITE).unwrap();
    /// let r: Raster = m.into();
    /// assert_eq!(r.count_matching(Rgb::WHITE), 1);
    /// assert_eq!(r.count_matching(Rgb::BLACK), 15);
    /// ```
    pub fn count_matching(&self, color: Rgb) -> u64 {
        let word = color.to_pixel32();
        let width = self.width() as usize;
        if self.total_pixels() >= PARALLEL_THRESHOLD {
            self.data()
                .par_chunks(width)
                .map(|row| count_in_row(row, word))
                .sum()
        } else {
            count_in_row(self.data(), word)
        }
    }

    /// Count pixels inside `region` whose color equals `color`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RegionOutOfBounds`] unless `region` is
    /// non-empty and lies entirely inside the raster.
    pub fn count_matching_in(&self, region: &Rect, color: Rgb) -> Result<u64> {
        region.check_within(self.width(), self.height())?;
        let word = color.to_pixel32();
        let x0 = region.x as usize;
        let x1 = x0 + region.w as usize;
        let rows = region.y..region.bottom();
        let count: u64 = if region.area() >= PARALLEL_THRESHOLD {
            rows.into_par_iter()
                .map(|y| count_in_row(&self.row_data(y)[x0..x1], word))
                .sum()
        } else {
            rows.map(|y| count_in_row(&self.row_data(y)[x0..x1], word))
                .sum()
        };
        Ok(count)
    }

    /// Collect the distinct colors present inside `region`, sorted
    /// ascending.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RegionOutOfBounds`] unless `region` is
    /// non-empty and lies entirely inside the raster.
    pub fn unique_colors_in(&self, region: &Rect) -> Result<BTreeSet<Rgb>> {
        region.check_within(self.width(), self.height())?;
        let x0 = region.x as usize;
        let x1 = x0 + region.w as usize;

        let mut seen: BTreeSet<u32> = BTreeSet::new();
        for y in region.y..region.bottom() {
            seen.extend(self.row_data(y)[x0..x1].iter().copied());
        }
        Ok(seen.into_iter().map(Rgb::from_pixel32).collect())
    }
}

impl RasterMut {
    /// Replace every pixel of color `from` with `to`.
    ///
    /// Returns the number of pixels rewritten.
    pub fn replace_color(&mut self, from: Rgb, to: Rgb) -> u64 {
        if from == to {
            return 0;
        }
        let (src, dst) = (from.to_pixel32(), to.to_pixel32());
        let mut replaced = 0;
        for p in self.data_mut().iter_mut().filter(|p| **p == src) {
            *p = dst;
            replaced += 1;
        }
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone() -> Raster {
        // left half white, right half (x >= 4) red
        let mut m = Raster::new_filled(8, 4, Rgb::WHITE).unwrap().to_mut();
        for y in 0..4 {
            for x in 4..8 {
                m.set_rgb(x, y, Rgb::new(255, 0, 0)).unwrap();
            }
        }
        m.into()
    }

    #[test]
    fn test_count_matching_in() {
        let r = two_tone();
        assert_eq!(r.count_matching_in(&Rect::new(2, 0, 4, 4), Rgb::WHITE).unwrap(), 8);
        assert_eq!(r.count_matching_in(&r.bounds(), Rgb::WHITE).unwrap(), 16);
        assert!(r.count_matching_in(&Rect::new(6, 0, 4, 4), Rgb::WHITE).is_err());
    }

    #[test]
    fn test_count_matching_parallel_path() {
        let r = Raster::new_filled(1024, 1024, Rgb::WHITE).unwrap();
        assert_eq!(r.count_matching(Rgb::WHITE), 1 << 20);
        assert_eq!(r.count_matching_in(&r.bounds(), Rgb::BLACK).unwrap(), 0);
    }

    #[test]
    fn test_unique_colors_in() {
        let r = two_tone();
        let left = r.unique_colors_in(&Rect::new(0, 0, 2, 4)).unwrap();
        assert_eq!(left.into_iter().collect::<Vec<_>>(), vec![Rgb::WHITE]);
        let all = r.unique_colors_in(&r.bounds()).unwrap();
        assert_eq!(
            all.into_iter().collect::<Vec<_>>(),
            vec![Rgb::new(255, 0, 0), Rgb::WHITE]
        );
    }

    #[test]
    fn test_replace_color() {
        let mut m = two_tone().to_mut();
        assert_eq!(m.replace_color(Rgb::new(255, 0, 0), Rgb::WHITE), 16);
        assert_eq!(m.replace_color(Rgb::WHITE, Rgb::WHITE), 0);
        let r: Raster = m.into();
        assert_eq!(r.count_matching(Rgb::WHITE), 32);
    }
}
