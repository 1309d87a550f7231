//! Tile grid planning
//!
//! Splits a `W` x `H` slide into `patch_size` squares in row-major order.
//! The last column and row are clipped to whatever pixels remain, so the
//! tiles cover the slide exactly with no overlap.

use crate::{TissueError, TissueResult};
use tilesift_core::Rect;

/// Row-major tile layout over a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    patch_size: u32,
}

/// One tile position in a [`TileGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    /// Zero-based position in row-major order
    pub index: usize,
    /// Column and row of the tile in the grid
    pub col: u32,
    pub row: u32,
    /// Slide pixels covered by the tile
    pub rect: Rect,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, patch_size: u32) -> TissueResult<Self> {
        if patch_size == 0 {
            return Err(TissueError::InvalidPatchSize);
        }
        if width == 0 || height == 0 {
            return Err(TissueError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            patch_size,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn patch_size(&self) -> u32 {
        self.patch_size
    }

    pub fn tiles_x(&self) -> u32 {
        self.width.div_ceil(self.patch_size)
    }

    pub fn tiles_y(&self) -> u32 {
        self.height.div_ceil(self.patch_size)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles_x() as usize * self.tiles_y() as usize
    }

    /// Tiles in row-major order.
    pub fn iter(&self) -> TileIter {
        TileIter {
            grid: *self,
            index: 0,
            x: 0,
            y: 0,
        }
    }

    /// Placement of the tile at `index`, if it exists.
    pub fn placement(&self, index: usize) -> Option<TilePlacement> {
        if index >= self.tile_count() {
            return None;
        }
        let per_row = self.tiles_x() as usize;
        let col = (index % per_row) as u32;
        let row = (index / per_row) as u32;
        let x = col * self.patch_size;
        let y = row * self.patch_size;
        Some(TilePlacement {
            index,
            col,
            row,
            rect: Rect::new(
                x,
                y,
                self.patch_size.min(self.width - x),
                self.patch_size.min(self.height - y),
            ),
        })
    }

    /// Names tiles `<sample_id>_<seq>` with a 1-based sequence number
    /// zero-padded to one more digit than the tile count has.
    pub fn namer(&self, sample_id: &str) -> TileNamer {
        TileNamer {
            prefix: sample_id.to_string(),
            digits: self.tile_count().to_string().len() + 1,
        }
    }
}

impl IntoIterator for &TileGrid {
    type Item = TilePlacement;
    type IntoIter = TileIter;

    fn into_iter(self) -> TileIter {
        self.iter()
    }
}

/// Walks the grid by advancing across each row by the actual tile width
/// and down by the actual tile height, stopping when the row offset
/// reaches the slide height.
#[derive(Debug, Clone)]
pub struct TileIter {
    grid: TileGrid,
    index: usize,
    x: u32,
    y: u32,
}

impl Iterator for TileIter {
    type Item = TilePlacement;

    fn next(&mut self) -> Option<TilePlacement> {
        let TileGrid {
            width,
            height,
            patch_size,
        } = self.grid;
        if self.y >= height {
            return None;
        }
        let w = patch_size.min(width - self.x);
        let h = patch_size.min(height - self.y);
        let placement = TilePlacement {
            index: self.index,
            col: self.x / patch_size,
            row: self.y / patch_size,
            rect: Rect::new(self.x, self.y, w, h),
        };

        self.index += 1;
        self.x += w;
        if self.x == width {
            self.x = 0;
            self.y += h;
        }
        Some(placement)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.tile_count() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileIter {}

/// Produces tile names for one grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileNamer {
    prefix: String,
    digits: usize,
}

impl TileNamer {
    /// Width of the zero-padded sequence number.
    pub fn digits(&self) -> usize {
        self.digits
    }

    /// Name of the tile at zero-based `index`.
    pub fn name(&self, index: usize) -> String {
        format!("{}_{:0width$}", self.prefix, index + 1, width = self.digits)
    }
}

/// Dimension string of a tile, `"{w}x{h}"`.
pub fn dimension_label(rect: &Rect) -> String {
    format!("{}x{}", rect.w, rect.h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let g = TileGrid::new(1000, 1000, 400).unwrap();
        assert_eq!((g.tiles_x(), g.tiles_y(), g.tile_count()), (3, 3, 9));
        let exact = TileGrid::new(800, 400, 400).unwrap();
        assert_eq!(exact.tile_count(), 2);
        let tiny = TileGrid::new(5, 3, 1000).unwrap();
        assert_eq!(tiny.tile_count(), 1);
    }

    #[test]
    fn test_iteration_order_and_clipping() {
        let g = TileGrid::new(1000, 500, 400).unwrap();
        let rects: Vec<Rect> = g.iter().map(|t| t.rect).collect();
        assert_eq!(
            rects,
            vec![
                Rect::new(0, 0, 400, 400),
                Rect::new(400, 0, 400, 400),
                Rect::new(800, 0, 200, 400),
                Rect::new(0, 400, 400, 100),
                Rect::new(400, 400, 400, 100),
                Rect::new(800, 400, 200, 100),
            ]
        );
        assert_eq!(g.iter().len(), 6);
    }

    #[test]
    fn test_placement_matches_iter() {
        let g = TileGrid::new(1037, 263, 128).unwrap();
        for t in &g {
            assert_eq!(g.placement(t.index), Some(t));
        }
        assert_eq!(g.placement(g.tile_count()), None);
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(TileGrid::new(10, 10, 0), Err(TissueError::InvalidPatchSize)));
        assert!(matches!(
            TileGrid::new(0, 10, 4),
            Err(TissueError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_names() {
        let g = TileGrid::new(1000, 1000, 400).unwrap();
        let namer = g.namer("S1");
        assert_eq!(namer.digits(), 2);
        assert_eq!(namer.name(0), "S1_01");
        assert_eq!(namer.name(8), "S1_09");

        let big = TileGrid::new(100, 100, 10).unwrap();
        assert_eq!(big.namer("x").name(99), "x_0100");
    }

    #[test]
    fn test_dimension_label() {
        assert_eq!(dimension_label(&Rect::new(5, 5, 200, 400)), "200x400");
    }
}
