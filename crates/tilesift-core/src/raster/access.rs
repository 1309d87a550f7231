//! Pixel access functions
//!
//! Low-level functions for getting and setting individual pixels.

use super::{Raster, RasterMut};
use crate::color::Rgb;
use crate::error::{Error, Result};

impl Raster {
    /// Get a pixel word at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel word without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        self.data()[y as usize * self.width() as usize + x as usize]
    }

    /// Get the color at (x, y).
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<Rgb> {
        self.get_pixel(x, y).map(Rgb::from_pixel32)
    }
}

impl RasterMut {
    /// Get a pixel word at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel word without bounds checking.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        self.data()[y as usize * self.width() as usize + x as usize]
    }

    /// Get the color at (x, y).
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<Rgb> {
        self.get_pixel(x, y).map(Rgb::from_pixel32)
    }

    /// Set a pixel word without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let idx = y as usize * self.width() as usize + x as usize;
        self.data_mut()[idx] = val;
    }

    /// Set the color at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::PixelOutOfBounds`] if coordinates are out of bounds.
    pub fn set_rgb(&mut self, x: u32, y: u32, color: Rgb) -> Result<()> {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return Err(Error::PixelOutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        self.set_pixel_unchecked(x, y, color.to_pixel32());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_out_of_bounds() {
        let r = Raster::new(2, 3).unwrap();
        assert_eq!(r.get_pixel(2, 0), None);
        assert_eq!(r.get_pixel(0, 3), None);
        assert_eq!(r.get_rgb(1, 2), Some(Rgb::BLACK));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut m = Raster::new(2, 2).unwrap().to_mut();
        assert!(matches!(
            m.set_rgb(2, 0, Rgb::WHITE),
            Err(Error::PixelOutOfBounds { x: 2, y: 0, .. })
        ));
        m.set_rgb(1, 0, Rgb::new(7, 8, 9)).unwrap();
        assert_eq!(m.get_rgb(1, 0), Some(Rgb::new(7, 8, 9)));
    }
}
