//! Synthetic slides and masks
//!
//! Builders for small, fully deterministic inputs: flat backgrounds with
//! painted tissue rectangles, textured slide content, and low-resolution
//! masks that upscale exactly onto a slide.

use tilesift_core::{Raster, Rect, Rgb};

/// Segmentation color used for tissue in synthetic masks.
pub const TISSUE: Rgb = Rgb::BLACK;

/// A raster filled with one color.
///
/// # Panics
///
/// Panics on a zero dimension.
pub fn solid(width: u32, height: u32, color: Rgb) -> Raster {
    Raster::new_filled(width, height, color).expect("non-zero synthetic raster")
}

/// Copy of `base` with `rect` (clipped to the raster) painted `color`.
pub fn with_rect(base: &Raster, rect: Rect, color: Rgb) -> Raster {
    let mut m = base.to_mut();
    if let Some(r) = rect.intersect(&base.bounds()) {
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                m.set_pixel_unchecked(x, y, color.to_pixel32());
            }
        }
    }
    m.into()
}

/// Paint each `(rect, color)` pair onto a `width x height` canvas of `bg`.
pub fn painted(width: u32, height: u32, bg: Rgb, regions: &[(Rect, Rgb)]) -> Raster {
    regions
        .iter()
        .fold(solid(width, height, bg), |acc, &(rect, color)| {
            with_rect(&acc, rect, color)
        })
}

/// A slide with a position-dependent texture, so any two distinct
/// regions differ. Useful for checking that tiles land where they should.
pub fn textured_slide(width: u32, height: u32) -> Raster {
    let mut m = solid(width, height, Rgb::BLACK).to_mut();
    for y in 0..height {
        for x in 0..width {
            let c = Rgb::new((x % 251) as u8, (y % 241) as u8, ((x / 251 + y / 241) % 256) as u8);
            m.set_pixel_unchecked(x, y, c.to_pixel32());
        }
    }
    m.into()
}

/// Reduce a full-resolution mask by an integer `factor` using the top-left
/// sample of each block.
///
/// When every painted rectangle is aligned to `factor`, nearest-neighbour
/// upscaling of the result reproduces `full` exactly.
///
/// # Panics
///
/// Panics if `factor` is 0 or does not divide both dimensions.
pub fn reduce_mask(full: &Raster, factor: u32) -> Raster {
    assert!(factor > 0, "factor must be positive");
    let (w, h) = full.dimensions();
    assert!(w % factor == 0 && h % factor == 0, "factor must divide dimensions");
    let mut m = solid(w / factor, h / factor, Rgb::BLACK).to_mut();
    for y in 0..h / factor {
        for x in 0..w / factor {
            m.set_pixel_unchecked(x, y, full.get_pixel_unchecked(x * factor, y * factor));
        }
    }
    m.into()
}
