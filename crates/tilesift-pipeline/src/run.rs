//! The tiling run
//!
//! Stages, in order: read the mask, identify and consolidate its
//! background, open the slide, bring the mask to slide resolution, plan
//! the grid, then classify every tile. Tiles are processed by a pool of
//! scoped worker threads that pull indices from a shared counter and send
//! their outcome over a bounded channel; the calling thread collects
//! outcomes by tile index, places thumbnail cells and finally writes the
//! thumbnail and the report.

use crate::cancel::CancelToken;
use crate::config::PipelineConfig;
use crate::patches::PatchWriter;
use crate::report::{ClassificationRecord, write_report_file};
use crate::slide::{RasterSlide, SlideReader};
use crate::thumbnail::{ThumbnailBuilder, ThumbnailLayout, write_thumbnail};
use crate::{PipelineError, PipelineResult};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;
use std::time::{Duration, Instant};
use tilesift_core::{Raster, Rect, Rgb};
use tilesift_io::{IoError, IoResult};
use tilesift_tissue::{
    Background, BackgroundColorResolver, Threshold, TileGrid, TileNamer, TilePlacement,
    TissueClassifier, consolidate_mask, dimension_label,
};
use tilesift_transform::{TransformError, scale_to_size};
use tracing::{debug, info, warn};

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub tile_count: usize,
    pub kept: usize,
    /// Canonical background color
    pub background: Rgb,
    /// Every background-like color found in the sampled regions
    pub background_colors: BTreeSet<Rgb>,
    /// One record per tile in grid order
    pub records: Vec<ClassificationRecord>,
    pub report_path: PathBuf,
    pub thumbnail_path: Option<PathBuf>,
    pub tiles_dir: Option<PathBuf>,
    pub elapsed: Duration,
}

/// Result of processing one tile on a worker.
struct TileOutcome {
    index: usize,
    record: ClassificationRecord,
    cell: Option<(Rect, Raster)>,
}

/// Read-only state shared by the workers.
struct TileContext<'a> {
    slide: &'a dyn SlideReader,
    mask: &'a Raster,
    grid: TileGrid,
    classifier: TissueClassifier,
    namer: &'a TileNamer,
    patches: Option<&'a PatchWriter>,
    layout: Option<ThumbnailLayout>,
    retries: u32,
    cancel: &'a CancelToken,
    abort: AtomicBool,
    next: AtomicUsize,
}

fn tile_failure(placement: &TilePlacement, source: IoError) -> PipelineError {
    PipelineError::Tile {
        index: placement.index,
        x: placement.rect.x,
        y: placement.rect.y,
        source,
    }
}

/// Run `op`, retrying up to `retries` more times on failure.
fn with_retries<T>(
    retries: u32,
    index: usize,
    action: &str,
    mut op: impl FnMut() -> IoResult<T>,
) -> IoResult<T> {
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(error) if attempt < retries => {
                attempt += 1;
                warn!(index, attempt, retries, %error, "{} failed, retrying", action);
            }
            Err(error) => return Err(error),
        }
    }
}

impl TileContext<'_> {
    fn work(&self, tx: SyncSender<PipelineResult<TileOutcome>>) {
        loop {
            if self.cancel.is_cancelled() || self.abort.load(Ordering::SeqCst) {
                break;
            }
            let index = self.next.fetch_add(1, Ordering::SeqCst);
            let Some(placement) = self.grid.placement(index) else {
                break;
            };
            let outcome = self.process(&placement);
            let failed = outcome.is_err();
            if failed {
                self.abort.store(true, Ordering::SeqCst);
            }
            if tx.send(outcome).is_err() || failed {
                break;
            }
        }
    }

    fn process(&self, placement: &TilePlacement) -> PipelineResult<TileOutcome> {
        let TilePlacement { index, rect, .. } = *placement;

        let tile = with_retries(self.retries, index, "region read", || {
            self.slide.read_region(&rect)
        })
        .map_err(|source| tile_failure(placement, source))?;

        let classification = self.classifier.classify_region(self.mask, &rect)?;
        let decision = classification.decision;
        let name = self.namer.name(index);
        debug!(
            index,
            tile = %name,
            x = rect.x,
            y = rect.y,
            background = classification.background_pixels,
            total = classification.total_pixels,
            keep = decision.as_flag(),
            "classified tile"
        );

        if decision.is_keep()
            && let Some(writer) = self.patches
        {
            with_retries(self.retries, index, "patch write", || writer.write(&name, &tile))
                .map_err(|source| tile_failure(placement, source))?;
        }

        let cell = match &self.layout {
            Some(layout) => layout.render_cell(&tile, &rect, decision)?,
            None => None,
        };

        Ok(TileOutcome {
            index,
            record: ClassificationRecord {
                name,
                dimensions: dimension_label(&rect),
                decision,
            },
            cell,
        })
    }
}

/// Drain every outcome, keeping records ordered by tile index.
///
/// The channel is always drained so that workers blocked on a full
/// channel can exit after a failure.
fn collect(
    rx: Receiver<PipelineResult<TileOutcome>>,
    abort: &AtomicBool,
    mut thumbnail: Option<&mut ThumbnailBuilder>,
) -> PipelineResult<BTreeMap<usize, ClassificationRecord>> {
    let mut records = BTreeMap::new();
    let mut first_error = None;
    for outcome in rx {
        match outcome {
            Ok(outcome) => {
                if let (Some(builder), Some((cell, reduced))) =
                    (thumbnail.as_deref_mut(), &outcome.cell)
                {
                    builder.place(cell, reduced);
                }
                records.insert(outcome.index, outcome.record);
            }
            Err(error) => {
                abort.store(true, Ordering::SeqCst);
                first_error.get_or_insert(error);
            }
        }
    }
    match first_error {
        Some(error) => Err(error),
        None => Ok(records),
    }
}

/// Drives a tiling run from a validated configuration.
#[derive(Debug, Clone)]
pub struct PatchPipeline {
    config: PipelineConfig,
}

impl PatchPipeline {
    /// # Errors
    ///
    /// [`PipelineError::Config`] if the configuration does not validate.
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run on the mask and slide files named by the configuration.
    #[tracing::instrument(skip_all, fields(sample_id = %self.config.sample_id))]
    pub fn run(&self, cancel: &CancelToken) -> PipelineResult<RunSummary> {
        let mask_path = self.config.mask_path();
        info!(path = %mask_path.display(), "reading mask");
        let mask = tilesift_io::read_image(&mask_path).map_err(|source| PipelineError::Input {
            path: mask_path.clone(),
            source,
        })?;
        let (mask, background) = self.prepare_mask(mask)?;

        let slide_path = &self.config.svs_fname;
        info!(path = %slide_path.display(), "reading slide");
        let slide = RasterSlide::open(slide_path).map_err(|source| PipelineError::Input {
            path: slide_path.clone(),
            source,
        })?;
        self.tile(mask, background, &slide, cancel)
    }

    /// Run on an already decoded mask and an open slide.
    pub fn run_with(
        &self,
        mask: Raster,
        slide: &dyn SlideReader,
        cancel: &CancelToken,
    ) -> PipelineResult<RunSummary> {
        let (mask, background) = self.prepare_mask(mask)?;
        self.tile(mask, background, slide, cancel)
    }

    /// Identify the background and fold its variants into one color.
    pub fn prepare_mask(&self, mask: Raster) -> PipelineResult<(Raster, Background)> {
        let resolver = BackgroundColorResolver::new(
            self.config.border_flags()?,
            self.config.corner_flags()?,
            self.config.lines,
        )?;
        info!(regions = ?resolver.regions(), lines = self.config.lines, "identifying background");
        let background = resolver.resolve(&mask)?;
        let (mask, replaced) = consolidate_mask(mask, &background);
        info!(
            background = %background.canonical(),
            variants = background.colors().len() - 1,
            replaced,
            "background identified"
        );
        Ok((mask, background))
    }

    fn tile(
        &self,
        mask: Raster,
        background: Background,
        slide: &dyn SlideReader,
        cancel: &CancelToken,
    ) -> PipelineResult<RunSummary> {
        let started = Instant::now();
        let cfg = &self.config;
        let (width, height) = slide.dimensions();

        info!(width, height, method = ?cfg.mask_resize, "resizing mask");
        let mask = scale_to_size(&mask, width, height, cfg.mask_resize.scale_method())?;

        let grid = TileGrid::new(width, height, cfg.patch_size)?;
        let tile_count = grid.tile_count();
        info!(tile_count, "counted tiles");

        fs::create_dir_all(&cfg.output_dir)
            .map_err(|e| PipelineError::output(&cfg.output_dir, e))?;
        let patches = if cfg.save_patches {
            let dir = cfg.tiles_dir();
            Some(PatchWriter::create(&dir, cfg.jpeg_quality).map_err(|e| PipelineError::output(dir, e))?)
        } else {
            None
        };
        let layout = cfg.save_tilecrossed_images.then(|| {
            ThumbnailLayout::new(
                width,
                height,
                cfg.thumbnail_scale,
                cfg.cross_rgb(),
                cfg.cross_width,
            )
        });
        let mut thumbnail = layout
            .map(ThumbnailBuilder::new)
            .transpose()
            .map_err(TransformError::from)?;

        let namer = grid.namer(&cfg.sample_id);
        let ctx = TileContext {
            slide,
            mask: &mask,
            grid,
            classifier: TissueClassifier::new(background.canonical(), Threshold::new(cfg.threshold)?),
            namer: &namer,
            patches: patches.as_ref(),
            layout,
            retries: cfg.io_retries,
            cancel,
            abort: AtomicBool::new(false),
            next: AtomicUsize::new(0),
        };

        let workers = cfg.workers.min(tile_count);
        info!(workers, "producing patches");
        let (tx, rx) = mpsc::sync_channel(cfg.channel_capacity);
        let records = thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let ctx = &ctx;
                scope.spawn(move || ctx.work(tx));
            }
            drop(tx);
            collect(rx, &ctx.abort, thumbnail.as_mut())
        })?;

        if records.len() < tile_count {
            warn!(completed = records.len(), tile_count, "run cancelled");
            return Err(PipelineError::Cancelled {
                completed: records.len(),
            });
        }
        let records: Vec<ClassificationRecord> = records.into_values().collect();
        let kept = records.iter().filter(|r| r.decision.is_keep()).count();

        let thumbnail_path = match thumbnail {
            Some(builder) => {
                let path = cfg.thumbnail_path();
                info!(path = %path.display(), "writing thumbnail");
                write_thumbnail(&builder.finish(), &path, cfg.jpeg_quality)
                    .map_err(|e| PipelineError::output(&path, e))?;
                Some(path)
            }
            None => None,
        };

        let report_path = cfg.report_path();
        info!(path = %report_path.display(), rows = records.len(), "writing report");
        write_report_file(&records, &report_path)
            .map_err(|e| PipelineError::output(&report_path, e))?;

        let summary = RunSummary {
            tile_count,
            kept,
            background: background.canonical(),
            background_colors: background.colors().clone(),
            records,
            report_path,
            thumbnail_path,
            tiles_dir: patches.map(|p| p.dir().to_path_buf()),
            elapsed: started.elapsed(),
        };
        info!(
            tile_count,
            kept,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "run finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_with_retries_succeeds_after_failures() {
        let calls = Cell::new(0);
        let result = with_retries(2, 7, "read", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(IoError::InvalidData("flaky".to_string()))
            } else {
                Ok(calls.get())
            }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_with_retries_gives_up() {
        let calls = Cell::new(0);
        let result: IoResult<()> = with_retries(1, 0, "read", || {
            calls.set(calls.get() + 1);
            Err(IoError::InvalidData("down".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_tile_failure_tags_position() {
        let placement = TilePlacement {
            index: 5,
            col: 2,
            row: 1,
            rect: Rect::new(800, 400, 200, 400),
        };
        let err = tile_failure(&placement, IoError::InvalidData("x".to_string()));
        assert!(matches!(
            err,
            PipelineError::Tile {
                index: 5,
                x: 800,
                y: 400,
                ..
            }
        ));
        assert!(err.to_string().contains("tile 5 at (800, 400)"));
    }
}
