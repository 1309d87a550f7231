//! Line rendering
//!
//! Integer Bresenham lines, optionally thickened with parallel strokes,
//! rendered in a solid color. Used to mark selected tiles on overview
//! images.

use super::RasterMut;
use crate::color::Rgb;

/// Generate the points of a line using Bresenham's integer algorithm.
///
/// The line connects `(x1, y1)` to `(x2, y2)` with 8-connectivity and
/// includes both endpoints.
pub fn generate_line_points(x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<(i32, i32)> {
    if x1 == x2 && y1 == y2 {
        return vec![(x1, y1)];
    }

    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x2 > x1 { 1i32 } else { -1 };
    let sy = if y2 > y1 { 1i32 } else { -1 };

    let npts = dx.max(dy) + 1;
    let mut pts = Vec::with_capacity(npts as usize);

    let mut x = x1;
    let mut y = y1;

    if dx >= dy {
        // Step along x (more horizontal)
        let mut err = dx / 2;
        for _ in 0..npts {
            pts.push((x, y));
            err -= dy;
            if err < 0 {
                y += sy;
                err += dx;
            }
            x += sx;
        }
    } else {
        // Step along y (more vertical)
        let mut err = dy / 2;
        for _ in 0..npts {
            pts.push((x, y));
            err -= dx;
            if err < 0 {
                x += sx;
                err += dy;
            }
            y += sy;
        }
    }

    pts
}

/// Generate the points of a line with specified stroke width.
///
/// For width > 1, parallel lines are added alternately on both sides,
/// offset along the minor axis.
pub fn generate_wide_line_points(x1: i32, y1: i32, x2: i32, y2: i32, width: u32) -> Vec<(i32, i32)> {
    let width = width.max(1);
    let mut pts = generate_line_points(x1, y1, x2, y2);
    if width == 1 {
        return pts;
    }

    let is_horizontal = (x2 - x1).abs() > (y2 - y1).abs();
    for i in 1..width {
        let offset = i.div_ceil(2) as i32;
        let offset = if i % 2 == 1 { -offset } else { offset };
        let parallel = if is_horizontal {
            generate_line_points(x1, y1 + offset, x2, y2 + offset)
        } else {
            generate_line_points(x1 + offset, y1, x2 + offset, y2)
        };
        pts.extend(parallel);
    }
    pts
}

impl RasterMut {
    /// Render a solid-color line from (x1, y1) to (x2, y2).
    ///
    /// Points outside the raster are clipped.
    pub fn render_line_color(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, width: u32, color: Rgb) {
        let (w, h) = self.dimensions();
        let word = color.to_pixel32();
        for (x, y) in generate_wide_line_points(x1, y1, x2, y2, width) {
            if x < 0 || y < 0 || x >= w as i32 || y >= h as i32 {
                continue;
            }
            self.set_pixel_unchecked(x as u32, y as u32, word);
        }
    }

    /// Draw both diagonals of the raster.
    pub fn render_cross(&mut self, width: u32, color: Rgb) {
        let (w, h) = self.dimensions();
        let (xmax, ymax) = (w as i32 - 1, h as i32 - 1);
        self.render_line_color(0, 0, xmax, ymax, width, color);
        self.render_line_color(0, ymax, xmax, 0, width, color);
    }
}
