//! Command line front end for tilesift
//!
//! Arguments mirror [`PipelineConfig`] field by field. A TOML file given
//! with `--config` is loaded first and any flag present on the command
//! line overrides the value it carries.

pub mod logging;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;
use tilesift_pipeline::{MaskResize, PipelineConfig, PipelineError, RunSummary};

/// Errors reported by the command line tool
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Mask resampling choices accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResizeArg {
    Nearest,
    Linear,
}

impl From<ResizeArg> for MaskResize {
    fn from(arg: ResizeArg) -> Self {
        match arg {
            ResizeArg::Nearest => MaskResize::Nearest,
            ResizeArg::Linear => MaskResize::Linear,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tilesift")]
#[command(version, about = "Select tissue tiles from a whole-slide image", long_about = None)]
pub struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sample identifier used in output names
    #[arg(long, value_name = "ID")]
    pub sample_id: Option<String>,

    /// Full-resolution slide
    #[arg(long, value_name = "FILE")]
    pub svs_fname: Option<PathBuf>,

    /// Segmentation mask (default: segmented_<ID>.ppm)
    #[arg(long, value_name = "FILE")]
    pub mask_fname: Option<PathBuf>,

    /// Directory receiving patches, thumbnail and report
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Minimum tissue proportion to keep a tile (0-1)
    #[arg(short, long, value_name = "FLOAT")]
    pub threshold: Option<f64>,

    /// Tile edge length in pixels
    #[arg(short, long, value_name = "PIXELS")]
    pub patch_size: Option<u32>,

    /// Border depth and corner size sampled for background
    #[arg(long, value_name = "N")]
    pub lines: Option<u32>,

    /// Border strips to sample, as four 0/1 flags: top, left, bottom, right
    #[arg(long, value_name = "FLAGS")]
    pub borders: Option<String>,

    /// Corner squares to sample, as four 0/1 flags:
    /// top-left, bottom-left, bottom-right, top-right
    #[arg(long, value_name = "FLAGS")]
    pub corners: Option<String>,

    /// Write the thumbnail with crosses over kept tiles
    #[arg(long, value_name = "BOOL")]
    pub save_tilecrossed_images: Option<bool>,

    /// Write kept tiles as JPEG patches
    #[arg(long, value_name = "BOOL")]
    pub save_patches: Option<bool>,

    /// How the mask is brought to slide resolution
    #[arg(long, value_enum, value_name = "METHOD")]
    pub mask_resize: Option<ResizeArg>,

    /// Number of worker threads
    #[arg(short = 'j', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Classified tiles allowed in flight
    #[arg(long, value_name = "N")]
    pub channel_capacity: Option<usize>,

    /// Extra attempts for failed region reads and patch writes
    #[arg(long, value_name = "N")]
    pub io_retries: Option<u32>,

    /// JPEG quality for patches and thumbnail (1-100)
    #[arg(long, value_name = "Q")]
    pub jpeg_quality: Option<u8>,

    /// Thumbnail size relative to the slide
    #[arg(long, value_name = "FLOAT")]
    pub thumbnail_scale: Option<f64>,

    /// Cross color (comma-separated: R,G,B)
    #[arg(long, value_name = "R,G,B", value_parser = parse_rgb)]
    pub cross_color: Option<[u8; 3]>,

    /// Cross stroke width in slide pixels
    #[arg(long, value_name = "PIXELS")]
    pub cross_width: Option<u32>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse `R,G,B` into a color triple.
pub fn parse_rgb(s: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [r, g, b] = parts.as_slice() else {
        return Err(format!("expected R,G,B, got '{}'", s));
    };
    let channel = |v: &str| {
        v.parse::<u8>()
            .map_err(|_| format!("invalid channel '{}' (0-255)", v))
    };
    Ok([channel(r)?, channel(g)?, channel(b)?])
}

impl Cli {
    /// Resolve the effective configuration: file (or defaults), then flags.
    pub fn build_config(&self) -> Result<PipelineConfig, CliError> {
        let mut cfg = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        self.apply(&mut cfg);
        Ok(cfg)
    }

    /// Overwrite every field given on the command line.
    pub fn apply(&self, cfg: &mut PipelineConfig) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut cfg.sample_id, &self.sample_id);
        set(&mut cfg.svs_fname, &self.svs_fname);
        if self.mask_fname.is_some() {
            cfg.mask_fname = self.mask_fname.clone();
        }
        set(&mut cfg.output_dir, &self.output_dir);
        set(&mut cfg.threshold, &self.threshold);
        set(&mut cfg.patch_size, &self.patch_size);
        set(&mut cfg.lines, &self.lines);
        set(&mut cfg.borders, &self.borders);
        set(&mut cfg.corners, &self.corners);
        set(&mut cfg.save_tilecrossed_images, &self.save_tilecrossed_images);
        set(&mut cfg.save_patches, &self.save_patches);
        if let Some(resize) = self.mask_resize {
            cfg.mask_resize = resize.into();
        }
        set(&mut cfg.workers, &self.workers);
        set(&mut cfg.channel_capacity, &self.channel_capacity);
        set(&mut cfg.io_retries, &self.io_retries);
        set(&mut cfg.jpeg_quality, &self.jpeg_quality);
        set(&mut cfg.thumbnail_scale, &self.thumbnail_scale);
        set(&mut cfg.cross_color, &self.cross_color);
        set(&mut cfg.cross_width, &self.cross_width);
    }
}

/// One-line description of a finished run.
pub fn summary_line(sample_id: &str, summary: &RunSummary) -> String {
    format!(
        "{}: kept {} of {} tiles (background {}, {} variant(s)) in {:.2}s; report {}",
        sample_id,
        summary.kept,
        summary.tile_count,
        summary.background,
        summary.background_colors.len(),
        summary.elapsed.as_secs_f64(),
        summary.report_path.display()
    )
}
