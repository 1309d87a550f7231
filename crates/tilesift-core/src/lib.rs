//! tilesift Core - Basic data structures for slide tiling
//!
//! This crate provides the fundamental data structures used throughout
//! the tilesift workspace:
//!
//! - [`Raster`] / [`RasterMut`] - The RGB image container (immutable / mutable)
//! - [`Rect`] - Rectangle regions in pixel coordinates
//! - [`Rgb`] - A color triple with lexicographic ordering
//! - [`ImageFormat`] - File formats understood by `tilesift-io`

pub mod error;
pub mod raster;
pub mod rect;

pub use color::Rgb;
pub use error::{Error, Result};
pub use raster::{ImageFormat, Raster, RasterMut, generate_line_points, generate_wide_line_points};
pub use rect::Rect;

/// Color channel helpers and the [`Rgb`] triple.
///
/// # Pixel format
///
/// Raster pixels are stored as `0xRRGGBBAA` words (red in MSB, alpha in
/// LSB). Rasters are opaque: every stored pixel carries alpha = 255, so two
/// pixels hold the same color exactly when their words are equal.
pub mod color {
    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    /// Extract red component from a 32-bit pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a 32-bit pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a 32-bit pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Compose an opaque 32-bit pixel.
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
            | (255 << ALPHA_SHIFT)
    }

    /// Extract RGB values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel))
    }

    /// An RGB color triple.
    ///
    /// The derived ordering compares red, then green, then blue, which is
    /// the ascending lexicographic order used to pick a canonical color out
    /// of a set.
    ///
    /// ```
    /// use tilesift_core::Rgb;
    ///
    /// assert!(Rgb::new(0, 255, 255) < Rgb::new(1, 0, 0));
    /// assert!(Rgb::new(9, 9, 1) < Rgb::new(9, 9, 2));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct Rgb {
        pub r: u8,
        pub g: u8,
        pub b: u8,
    }

    impl Rgb {
        pub const BLACK: Rgb = Rgb::new(0, 0, 0);
        pub const WHITE: Rgb = Rgb::new(255, 255, 255);

        /// Create a color from its channels.
        pub const fn new(r: u8, g: u8, b: u8) -> Self {
            Self { r, g, b }
        }

        /// Pack into the raster word layout.
        #[inline]
        pub fn to_pixel32(self) -> u32 {
            compose_rgb(self.r, self.g, self.b)
        }

        /// Unpack from the raster word layout, ignoring alpha.
        #[inline]
        pub fn from_pixel32(pixel: u32) -> Self {
            let (r, g, b) = extract_rgb(pixel);
            Self { r, g, b }
        }
    }

    impl From<(u8, u8, u8)> for Rgb {
        fn from((r, g, b): (u8, u8, u8)) -> Self {
            Self { r, g, b }
        }
    }

    impl From<[u8; 3]> for Rgb {
        fn from([r, g, b]: [u8; 3]) -> Self {
            Self { r, g, b }
        }
    }

    impl std::fmt::Display for Rgb {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "({}, {}, {})", self.r, self.g, self.b)
        }
    }

}
