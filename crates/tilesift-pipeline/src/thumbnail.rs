//! Overview thumbnail with crosses over kept tiles
//!
//! The thumbnail is assembled at its final resolution: every tile is
//! reduced into its own cell as soon as it has been classified, so the
//! full-size canvas never exists. Kept tiles get both diagonals drawn at
//! full resolution before reduction.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tilesift_core::{Raster, RasterMut, Rect, Rgb};
use tilesift_io::IoResult;
use tilesift_io::jpeg::write_jpeg;
use tilesift_tissue::TileDecision;
use tilesift_transform::{ScaleMethod, TransformResult, scale_to_size};

/// Mapping from slide coordinates to thumbnail cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailLayout {
    slide_width: u32,
    slide_height: u32,
    width: u32,
    height: u32,
    cross_color: Rgb,
    cross_width: u32,
}

impl ThumbnailLayout {
    /// Thumbnail of `round(W * scale)` x `round(H * scale)`, at least 1x1.
    pub fn new(
        slide_width: u32,
        slide_height: u32,
        scale: f64,
        cross_color: Rgb,
        cross_width: u32,
    ) -> Self {
        let reduce = |len: u32| ((len as f64 * scale).round() as u32).clamp(1, len.max(1));
        Self {
            slide_width,
            slide_height,
            width: reduce(slide_width),
            height: reduce(slide_height),
            cross_color,
            cross_width,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Thumbnail cell covering slide rectangle `rect`.
    ///
    /// Cell edges are the floored images of the tile edges, so adjacent
    /// cells tile the thumbnail. `None` when the tile shrinks below a pixel.
    pub fn cell(&self, rect: &Rect) -> Option<Rect> {
        let map = |v: u32, thumb: u32, slide: u32| (v as u64 * thumb as u64 / slide as u64) as u32;
        let x0 = map(rect.x, self.width, self.slide_width);
        let y0 = map(rect.y, self.height, self.slide_height);
        let x1 = map(rect.right(), self.width, self.slide_width);
        let y1 = map(rect.bottom(), self.height, self.slide_height);
        let cell = Rect::new(x0, y0, x1 - x0, y1 - y0);
        (!cell.is_empty()).then_some(cell)
    }

    /// Reduce one tile into its cell, crossing it first if kept.
    pub fn render_cell(
        &self,
        tile: &Raster,
        rect: &Rect,
        decision: TileDecision,
    ) -> TransformResult<Option<(Rect, Raster)>> {
        let Some(cell) = self.cell(rect) else {
            return Ok(None);
        };
        let source = if decision.is_keep() {
            let mut crossed = tile.to_mut();
            crossed.render_cross(self.cross_width, self.cross_color);
            Raster::from(crossed)
        } else {
            tile.clone()
        };
        let reduced = scale_to_size(&source, cell.w, cell.h, ScaleMethod::AreaMap)?;
        Ok(Some((cell, reduced)))
    }
}

/// White canvas receiving reduced tile cells.
#[derive(Debug)]
pub struct ThumbnailBuilder {
    layout: ThumbnailLayout,
    canvas: RasterMut,
}

impl ThumbnailBuilder {
    pub fn new(layout: ThumbnailLayout) -> tilesift_core::Result<Self> {
        let (w, h) = layout.dimensions();
        let canvas = Raster::new_filled(w, h, Rgb::WHITE)?.into_mut();
        Ok(Self { layout, canvas })
    }

    pub fn layout(&self) -> &ThumbnailLayout {
        &self.layout
    }

    /// Paste a rendered cell at its position.
    pub fn place(&mut self, cell: &Rect, reduced: &Raster) {
        self.canvas.paste(reduced, cell.x, cell.y);
    }

    pub fn finish(self) -> Raster {
        self.canvas.into()
    }
}

/// Encode a finished thumbnail as JPEG.
pub fn write_thumbnail(thumbnail: &Raster, path: &Path, quality: u8) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_jpeg(thumbnail, &mut writer, quality)?;
    writer.flush()?;
    Ok(())
}
