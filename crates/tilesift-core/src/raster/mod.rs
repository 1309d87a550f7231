//! Raster - The main image container
//!
//! The `Raster` structure is the image type every tilesift crate passes
//! around: slide regions, segmentation masks, patches and thumbnails.
//!
//! # Pixel layout
//!
//! - One 32-bit word per pixel, rows stored contiguously
//! - Color order is RGBA (red in MSB), alpha is always 255
//!
//! # Ownership model
//!
//! `Raster` uses `Arc` for cheap cloning (shared ownership), so a finished
//! mask can be handed to many worker threads at once. To modify pixel data,
//! convert to `RasterMut` via [`Raster::try_into_mut`] or [`Raster::to_mut`],
//! then convert back with `Into<Raster>`.

mod access;
mod clip;
mod graphics;
mod histogram;

pub use graphics::{generate_line_points, generate_wide_line_points};

use crate::color::{self, Rgb};
use crate::error::{Error, Result};
use crate::rect::Rect;
use std::sync::Arc;

/// Rasters at or above this many pixels use row-parallel reductions.
pub(crate) const PARALLEL_THRESHOLD: u64 = 1 << 20;

/// Image file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Unknown format
    #[default]
    Unknown,
    /// JFIF JPEG format
    Jpeg,
    /// PNG format
    Png,
    /// TIFF format
    Tiff,
    /// PNM format
    Pnm,
}

impl ImageFormat {
    /// Get the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Unknown => "dat",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Tiff => "tif",
            Self::Pnm => "ppm",
        }
    }

    /// Guess the format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "tif" | "tiff" | "svs" => Self::Tiff,
            "pnm" | "ppm" | "pgm" => Self::Pnm,
            _ => Self::Unknown,
        }
    }
}

/// Internal raster data
#[derive(Debug, Clone)]
struct RasterData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Input file format
    informat: ImageFormat,
    /// The image data, one word per pixel, row-major
    data: Vec<u32>,
}

/// Raster - Main image container
///
/// # Examples
///
/// ```
/// use tilesift_core::{Raster, Rgb};
///
/// let raster = Raster::new_filled(64, 48, Rgb::WHITE).unwrap();
/// assert_eq!(raster.width(), 64);
/// assert_eq!(raster.height(), 48);
/// assert_eq!(raster.count_matching(Rgb::WHITE), 64 * 48);
/// ```
#[derive(Debug, Clone)]
pub struct Raster {
    inner: Arc<RasterData>,
}

impl Raster {
    /// Create a new black raster with the specified dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_filled(width, height, Rgb::BLACK)
    }

    /// Create a new raster with every pixel set to `fill`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new_filled(width: u32, height: u32, fill: Rgb) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = (width as usize) * (height as usize);
        Ok(Self::from_data(width, height, vec![fill.to_pixel32(); len]))
    }

    /// Create a raster from interleaved 8-bit RGB samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for a zero dimension and
    /// [`Error::BufferLength`] if `bytes` is not `width * height * 3` long.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = (width as usize) * (height as usize) * 3;
        if bytes.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: bytes.len(),
            });
        }
        let data = bytes
            .chunks_exact(3)
            .map(|px| color::compose_rgb(px[0], px[1], px[2]))
            .collect();
        Ok(Self::from_data(width, height, data))
    }

    fn from_data(width: u32, height: u32, data: Vec<u32>) -> Self {
        Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                informat: ImageFormat::Unknown,
                data,
            }),
        }
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Number of pixels in the raster.
    #[inline]
    pub fn total_pixels(&self) -> u64 {
        self.inner.width as u64 * self.inner.height as u64
    }

    /// The rectangle covering the whole raster.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.inner.width, self.inner.height)
    }

    /// Get the input file format.
    #[inline]
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get a single row of pixel words.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let w = self.inner.width as usize;
        let start = y as usize * w;
        &self.inner.data[start..start + w]
    }

    /// Check whether two rasters have the same dimensions.
    pub fn sizes_equal(&self, other: &Raster) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Interleaved 8-bit RGB samples, row-major.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.inner.data.len() * 3);
        for &pixel in &self.inner.data {
            let (r, g, b) = color::extract_rgb(pixel);
            out.extend_from_slice(&[r, g, b]);
        }
        out
    }

    /// Number of strong references to the shared pixel buffer.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Try to get exclusive ownership of the pixel buffer.
    ///
    /// Fails (returning `self`) if other clones are alive.
    pub fn try_into_mut(self) -> std::result::Result<RasterMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(inner) => Ok(RasterMut { inner }),
            Err(arc) => Err(Raster { inner: arc }),
        }
    }

    /// Create a mutable copy of this raster.
    pub fn to_mut(&self) -> RasterMut {
        RasterMut {
            inner: (*self.inner).clone(),
        }
    }

    /// Get exclusive ownership, copying only if the buffer is shared.
    pub fn into_mut(self) -> RasterMut {
        self.try_into_mut().unwrap_or_else(|shared| shared.to_mut())
    }
}

/// Mutable raster
///
/// Allows modification of image data. Convert back to an immutable
/// [`Raster`] using `Into<Raster>`.
#[derive(Debug)]
pub struct RasterMut {
    inner: RasterData,
}

impl RasterMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Set the input format.
    pub fn set_informat(&mut self, format: ImageFormat) {
        self.inner.informat = format;
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get mutable access to the image data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.inner.data
    }

    /// Get mutable access to a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data_mut(&mut self, y: u32) -> &mut [u32] {
        let w = self.inner.width as usize;
        let start = y as usize * w;
        &mut self.inner.data[start..start + w]
    }

    /// Set every pixel to `fill`.
    pub fn fill(&mut self, fill: Rgb) {
        let word = fill.to_pixel32();
        self.inner.data.iter_mut().for_each(|p| *p = word);
    }
}

impl From<RasterMut> for Raster {
    fn from(raster: RasterMut) -> Self {
        Raster {
            inner: Arc::new(raster.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_dimension() {
        assert!(matches!(
            Raster::new(0, 5),
            Err(Error::InvalidDimension { width: 0, height: 5 })
        ));
        assert!(Raster::new(5, 0).is_err());
    }

    #[test]
    fn test_new_is_black() {
        let r = Raster::new(3, 2).unwrap();
        assert_eq!(r.count_matching(Rgb::BLACK), 6);
        assert_eq!(r.total_pixels(), 6);
    }

    #[test]
    fn test_from_rgb_bytes() {
        let bytes = [1, 2, 3, 4, 5, 6];
        let r = Raster::from_rgb_bytes(2, 1, &bytes).unwrap();
        assert_eq!(r.get_rgb(0, 0), Some(Rgb::new(1, 2, 3)));
        assert_eq!(r.get_rgb(1, 0), Some(Rgb::new(4, 5, 6)));
        assert_eq!(r.to_rgb_bytes(), bytes.to_vec());
    }

    #[test]
    fn test_from_rgb_bytes_length_mismatch() {
        let err = Raster::from_rgb_bytes(2, 2, &[0u8; 11]).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferLength {
                expected: 12,
                actual: 11
            }
        ));
    }

    #[test]
    fn test_mut_roundtrip() {
        let r = Raster::new(4, 4).unwrap();
        let mut m = r.try_into_mut().unwrap();
        m.set_rgb(1, 1, Rgb::WHITE).unwrap();
        let r: Raster = m.into();
        assert_eq!(r.get_rgb(1, 1), Some(Rgb::WHITE));
        assert_eq!(r.count_matching(Rgb::WHITE), 1);
    }

    #[test]
    fn test_try_into_mut_shared_fails() {
        let r = Raster::new(2, 2).unwrap();
        let shared = r.clone();
        assert_eq!(r.ref_count(), 2);
        let r = r.try_into_mut().unwrap_err();
        drop(shared);
        assert!(r.try_into_mut().is_ok());
    }

    #[test]
    fn test_to_mut_copies() {
        let r = Raster::new_filled(2, 2, Rgb::WHITE).unwrap();
        let mut m = r.to_mut();
        m.fill(Rgb::BLACK);
        assert_eq!(r.count_matching(Rgb::WHITE), 4);
        assert_eq!(Raster::from(m).count_matching(Rgb::BLACK), 4);
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(ImageFormat::from_extension("PPM"), ImageFormat::Pnm);
        assert_eq!(ImageFormat::from_extension("svs"), ImageFormat::Tiff);
        assert_eq!(ImageFormat::from_extension("xyz"), ImageFormat::Unknown);
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
    }
}
