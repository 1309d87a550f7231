//! Run configuration
//!
//! A [`PipelineConfig`] is read from TOML, adjusted by the caller (the CLI
//! applies its flags on top) and checked with [`PipelineConfig::validate`]
//! before any file is opened. Every field has a default, so a TOML file
//! only needs the values it changes.

use crate::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tilesift_core::Rgb;
use tilesift_tissue::{BorderFlags, CornerFlags, Threshold};
use tilesift_transform::ScaleMethod;

/// Report file name, written under the output directory.
pub const REPORT_FILE_NAME: &str = "tile_selection.tsv";

/// How the low-resolution mask is brought to slide resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskResize {
    /// Nearest neighbor; keeps mask colors exact
    #[default]
    Nearest,
    /// Bilinear; blends colors along tissue edges
    Linear,
}

impl MaskResize {
    pub fn scale_method(self) -> ScaleMethod {
        match self {
            Self::Nearest => ScaleMethod::Sampling,
            Self::Linear => ScaleMethod::Linear,
        }
    }
}

/// Configuration of one tiling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sample identifier used in every output name
    pub sample_id: String,
    /// Minimum tissue proportion for a tile to be kept
    pub threshold: f64,
    /// Tile edge length in slide pixels
    pub patch_size: u32,
    /// Depth of border strips and size of corner squares sampled for background
    pub lines: u32,
    /// Border strips to sample: top, left, bottom, right
    pub borders: String,
    /// Corner squares to sample: top-left, bottom-left, bottom-right, top-right
    pub corners: String,
    /// Write the thumbnail with crosses over kept tiles
    pub save_tilecrossed_images: bool,
    /// Write kept tiles as JPEG patches
    pub save_patches: bool,
    /// Full-resolution slide
    pub svs_fname: PathBuf,
    /// Segmentation mask; `segmented_<sample_id>.ppm` when unset
    pub mask_fname: Option<PathBuf>,
    /// Directory receiving patches, thumbnail and report
    pub output_dir: PathBuf,
    pub mask_resize: MaskResize,
    /// Worker threads processing tiles
    pub workers: usize,
    /// Classified tiles allowed in flight between workers and the collector
    pub channel_capacity: usize,
    /// Extra attempts for a failed region read or patch write
    pub io_retries: u32,
    pub jpeg_quality: u8,
    /// Thumbnail size relative to the slide
    pub thumbnail_scale: f64,
    pub cross_color: [u8; 3],
    pub cross_width: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_id: String::new(),
            threshold: 0.5,
            patch_size: 512,
            lines: 10,
            borders: "1111".to_string(),
            corners: "0000".to_string(),
            save_tilecrossed_images: true,
            save_patches: true,
            svs_fname: PathBuf::new(),
            mask_fname: None,
            output_dir: PathBuf::from("."),
            mask_resize: MaskResize::Nearest,
            workers: 1,
            channel_capacity: 16,
            io_retries: 0,
            jpeg_quality: 90,
            thumbnail_scale: 0.05,
            cross_color: [0, 0, 255],
            cross_width: 10,
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> PipelineResult<Self> {
        toml::from_str(text).map_err(|e| PipelineError::Config(format!("invalid TOML: {}", e)))
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> PipelineResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("cannot serialize: {}", e)))
    }

    /// Check every field; the first problem found is reported.
    pub fn validate(&self) -> PipelineResult<()> {
        let invalid = |msg: String| Err(PipelineError::Config(msg));

        if self.sample_id.trim().is_empty() {
            return invalid("sample_id must not be empty".to_string());
        }
        if self.svs_fname.as_os_str().is_empty() {
            return invalid("svs_fname must be set".to_string());
        }
        if Threshold::new(self.threshold).is_err() {
            return invalid(format!("threshold {} outside [0, 1]", self.threshold));
        }
        if self.patch_size == 0 {
            return invalid("patch_size must be positive".to_string());
        }
        if self.lines == 0 {
            return invalid("lines must be positive".to_string());
        }
        let borders = self.border_flags()?;
        let corners = self.corner_flags()?;
        if !borders.any() && !corners.any() {
            return invalid(
                "at least one border or corner must be enabled to find the background"
                    .to_string(),
            );
        }
        if self.workers == 0 {
            return invalid("workers must be positive".to_string());
        }
        if self.channel_capacity == 0 {
            return invalid("channel_capacity must be positive".to_string());
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return invalid(format!("jpeg_quality {} outside 1..=100", self.jpeg_quality));
        }
        if !(self.thumbnail_scale > 0.0 && self.thumbnail_scale <= 1.0) {
            return invalid(format!(
                "thumbnail_scale {} outside (0, 1]",
                self.thumbnail_scale
            ));
        }
        if self.cross_width == 0 {
            return invalid("cross_width must be positive".to_string());
        }
        Ok(())
    }

    pub fn border_flags(&self) -> PipelineResult<BorderFlags> {
        self.borders
            .parse()
            .map_err(|e| PipelineError::Config(format!("borders: {}", e)))
    }

    pub fn corner_flags(&self) -> PipelineResult<CornerFlags> {
        self.corners
            .parse()
            .map_err(|e| PipelineError::Config(format!("corners: {}", e)))
    }

    pub fn cross_rgb(&self) -> Rgb {
        Rgb::from(self.cross_color)
    }

    pub fn mask_path(&self) -> PathBuf {
        self.mask_fname
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("segmented_{}.ppm", self.sample_id)))
    }

    pub fn tiles_dir(&self) -> PathBuf {
        self.output_dir.join(format!("{}_tiles", self.sample_id))
    }

    pub fn thumbnail_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("tilecrossed_{}.jpg", self.sample_id))
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PipelineConfig {
        PipelineConfig {
            sample_id: "S1".to_string(),
            svs_fname: PathBuf::from("S1.svs"),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_defaults_validate() {
        assert!(valid().validate().is_ok());
        assert!(PipelineConfig::default().validate().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let cfg = PipelineConfig::from_toml_str(
            r#"
            sample_id = "TCGA-01"
            threshold = 0.25
            borders = "1000"
            mask_resize = "linear"
            svs_fname = "slides/TCGA-01.svs"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.sample_id, "TCGA-01");
        assert_eq!(cfg.threshold, 0.25);
        assert_eq!(cfg.mask_resize, MaskResize::Linear);
        assert_eq!(cfg.patch_size, 512);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.mask_path(), PathBuf::from("segmented_TCGA-01.ppm"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut cfg = valid();
        cfg.mask_fname = Some(PathBuf::from("m.ppm"));
        cfg.workers = 4;
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(PipelineConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn test_unknown_resize_rejected() {
        assert!(matches!(
            PipelineConfig::from_toml_str("mask_resize = \"cubic\""),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects() {
        let cases: Vec<Box<dyn Fn(&mut PipelineConfig)>> = vec![
            Box::new(|c| c.threshold = 1.5),
            Box::new(|c| c.threshold = -0.01),
            Box::new(|c| c.patch_size = 0),
            Box::new(|c| c.lines = 0),
            Box::new(|c| c.borders = "111".to_string()),
            Box::new(|c| c.corners = "01x0".to_string()),
            Box::new(|c| {
                c.borders = "0000".to_string();
                c.corners = "0000".to_string();
            }),
            Box::new(|c| c.workers = 0),
            Box::new(|c| c.channel_capacity = 0),
            Box::new(|c| c.jpeg_quality = 0),
            Box::new(|c| c.thumbnail_scale = 0.0),
            Box::new(|c| c.thumbnail_scale = 1.5),
            Box::new(|c| c.cross_width = 0),
            Box::new(|c| c.sample_id = " ".to_string()),
        ];
        for (i, mutate) in cases.iter().enumerate() {
            let mut cfg = valid();
            mutate(&mut cfg);
            assert!(
                matches!(cfg.validate(), Err(PipelineError::Config(_))),
                "case {} accepted",
                i
            );
        }
    }

    #[test]
    fn test_corners_only_is_enough() {
        let mut cfg = valid();
        cfg.borders = "0000".to_string();
        cfg.corners = "0001".to_string();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_output_paths() {
        let mut cfg = valid();
        cfg.output_dir = PathBuf::from("out");
        assert_eq!(cfg.tiles_dir(), PathBuf::from("out/S1_tiles"));
        assert_eq!(cfg.thumbnail_path(), PathBuf::from("out/tilecrossed_S1.jpg"));
        assert_eq!(cfg.report_path(), PathBuf::from("out/tile_selection.tsv"));
    }
}
