//! Image scaling operations
//!
//! Three resampling algorithms:
//! - Sampling (nearest neighbor, exact for label images)
//! - Linear interpolation on pixel centers
//! - Area mapping (coverage-weighted averaging for reduction)

use crate::{TransformError, TransformResult};
use rayon::prelude::*;
use tilesift_core::{Raster, color};

/// Output rasters at least this large are filled row-parallel.
const PARALLEL_THRESHOLD: u64 = 1 << 18;

/// Scaling method to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMethod {
    /// Nearest-neighbor sampling; never invents colors
    #[default]
    Sampling,
    /// Bilinear interpolation
    Linear,
    /// Area mapping; reduces with anti-aliasing, enlarges like `Linear`
    AreaMap,
}

/// Scale an image by the given factors
///
/// Output dimensions are `round(w * scale_x)` by `round(h * scale_y)`,
/// never less than 1.
///
/// # Errors
///
/// Returns [`TransformError::InvalidScaleFactor`] if either factor is not
/// a positive finite number.
pub fn scale(
    raster: &Raster,
    scale_x: f32,
    scale_y: f32,
    method: ScaleMethod,
) -> TransformResult<Raster> {
    for factor in [scale_x, scale_y] {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(TransformError::InvalidScaleFactor(format!(
                "{} (must be positive)",
                factor
            )));
        }
    }
    let w = ((raster.width() as f64 * scale_x as f64).round() as u32).max(1);
    let h = ((raster.height() as f64 * scale_y as f64).round() as u32).max(1);
    scale_to_size(raster, w, h, method)
}

/// Scale an image to a specific size
///
/// A zero `width` or `height` is derived from the other so the aspect
/// ratio is kept.
///
/// # Examples
///
/// ```
/// use tilesift_core::Raster;
/// use tilesift_transform::{ScaleMethod, scale_to_size};
///
/// let raster = Raster::new(400, 300).unwrap();
/// let small = scale_to_size(&raster, 100, 0, ScaleMethod::AreaMap).unwrap();
/// assert_eq!(small.dimensions(), (100, 75));
/// ```
pub fn scale_to_size(
    raster: &Raster,
    width: u32,
    height: u32,
    method: ScaleMethod,
) -> TransformResult<Raster> {
    let (sw, sh) = raster.dimensions();
    let (width, height) = match (width, height) {
        (0, 0) => {
            return Err(TransformError::InvalidParameters(
                "target width and height are both 0".to_string(),
            ));
        }
        (0, h) => (((sw as u64 * h as u64 + sh as u64 / 2) / sh as u64).max(1) as u32, h),
        (w, 0) => (w, ((sh as u64 * w as u64 + sw as u64 / 2) / sw as u64).max(1) as u32),
        dims => dims,
    };

    if (width, height) == (sw, sh) {
        return Ok(raster.clone());
    }

    match method {
        ScaleMethod::Sampling => scale_by_sampling(raster, width, height),
        ScaleMethod::Linear => scale_linear(raster, width, height),
        ScaleMethod::AreaMap if width <= sw && height <= sh => scale_area_map(raster, width, height),
        ScaleMethod::AreaMap => scale_linear(raster, width, height),
    }
}

/// Fill a new raster by evaluating `f` at every destination pixel.
fn resample<F>(width: u32, height: u32, f: F) -> TransformResult<Raster>
where
    F: Fn(u32, u32) -> u32 + Sync,
{
    let mut out = Raster::new(width, height)?.into_mut();
    let fill_row = |(y, row): (usize, &mut [u32])| {
        for (x, p) in row.iter_mut().enumerate() {
            *p = f(x as u32, y as u32);
        }
    };
    let row_len = width as usize;
    if width as u64 * height as u64 >= PARALLEL_THRESHOLD {
        out.data_mut()
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(fill_row);
    } else {
        out.data_mut().chunks_mut(row_len).enumerate().for_each(fill_row);
    }
    Ok(out.into())
}

fn scale_by_sampling(raster: &Raster, width: u32, height: u32) -> TransformResult<Raster> {
    let (sw, sh) = raster.dimensions();
    let xmap: Vec<u32> = (0..width)
        .map(|x| (x as u64 * sw as u64 / width as u64) as u32)
        .collect();
    let ymap: Vec<u32> = (0..height)
        .map(|y| (y as u64 * sh as u64 / height as u64) as u32)
        .collect();
    resample(width, height, |x, y| {
        raster.get_pixel_unchecked(xmap[x as usize], ymap[y as usize])
    })
}

/// Two source neighbors and the weight of the upper one.
#[derive(Clone, Copy)]
struct Tap {
    lo: u32,
    hi: u32,
    frac: f32,
}

fn linear_taps(src: u32, dst: u32) -> Vec<Tap> {
    let ratio = src as f32 / dst as f32;
    let last = (src - 1) as f32;
    (0..dst)
        .map(|d| {
            let pos = ((d as f32 + 0.5) * ratio - 0.5).clamp(0.0, last);
            let lo = pos.floor() as u32;
            Tap {
                lo,
                hi: (lo + 1).min(src - 1),
                frac: pos - lo as f32,
            }
        })
        .collect()
}

fn channels(pixel: u32) -> [f32; 3] {
    let (r, g, b) = color::extract_rgb(pixel);
    [r as f32, g as f32, b as f32]
}

fn compose(acc: [f32; 3]) -> u32 {
    let [r, g, b] = acc.map(|c| c.round().clamp(0.0, 255.0) as u8);
    color::compose_rgb(r, g, b)
}

fn scale_linear(raster: &Raster, width: u32, height: u32) -> TransformResult<Raster> {
    let xtaps = linear_taps(raster.width(), width);
    let ytaps = linear_taps(raster.height(), height);
    resample(width, height, |x, y| {
        let tx = xtaps[x as usize];
        let ty = ytaps[y as usize];
        let p00 = channels(raster.get_pixel_unchecked(tx.lo, ty.lo));
        let p10 = channels(raster.get_pixel_unchecked(tx.hi, ty.lo));
        let p01 = channels(raster.get_pixel_unchecked(tx.lo, ty.hi));
        let p11 = channels(raster.get_pixel_unchecked(tx.hi, ty.hi));
        let mut acc = [0.0f32; 3];
        for c in 0..3 {
            let top = p00[c] + (p10[c] - p00[c]) * tx.frac;
            let bottom = p01[c] + (p11[c] - p01[c]) * tx.frac;
            acc[c] = top + (bottom - top) * ty.frac;
        }
        compose(acc)
    })
}

/// Source indices covered by each destination index, with coverage
/// weights summing to 1.
fn area_taps(src: u32, dst: u32) -> Vec<Vec<(u32, f32)>> {
    let ratio = src as f64 / dst as f64;
    (0..dst)
        .map(|d| {
            let start = d as f64 * ratio;
            let end = ((d + 1) as f64 * ratio).min(src as f64);
            let mut taps = Vec::new();
            let mut i = start.floor() as u32;
            while (i as f64) < end && i < src {
                let covered = end.min(i as f64 + 1.0) - start.max(i as f64);
                if covered > 0.0 {
                    taps.push((i, (covered / ratio) as f32));
                }
                i += 1;
            }
            taps
        })
        .collect()
}

fn scale_area_map(raster: &Raster, width: u32, height: u32) -> TransformResult<Raster> {
    let xtaps = area_taps(raster.width(), width);
    let ytaps = area_taps(raster.height(), height);
    resample(width, height, |x, y| {
        let mut acc = [0.0f32; 3];
        for &(sy, wy) in &ytaps[y as usize] {
            for &(sx, wx) in &xtaps[x as usize] {
                let p = channels(raster.get_pixel_unchecked(sx, sy));
                let weight = wx * wy;
                for c in 0..3 {
                    acc[c] += p[c] * weight;
                }
            }
        }
        compose(acc)
    })
}
