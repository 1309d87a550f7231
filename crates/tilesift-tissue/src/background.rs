//! Background color inference and mask consolidation
//!
//! Segmentation masks often label background with several near-identical
//! colors. The resolver gathers every color seen in the enabled sample
//! regions; the smallest in RGB order becomes canonical. Consolidation
//! rewrites the other members to the canonical color so background is a
//! single exact value.

use crate::region::{BorderFlags, CornerFlags, SampleRegion, enabled_regions};
use crate::{TissueError, TissueResult};
use std::collections::BTreeSet;
use tilesift_core::{Raster, Rgb};

/// The inferred background of a mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    canonical: Rgb,
    colors: BTreeSet<Rgb>,
}

impl Background {
    /// Build from a set of observed colors; the smallest is canonical.
    ///
    /// Returns `None` for an empty set.
    pub fn from_colors(colors: BTreeSet<Rgb>) -> Option<Self> {
        let canonical = *colors.first()?;
        Some(Self { canonical, colors })
    }

    /// The single color background is folded into.
    pub fn canonical(&self) -> Rgb {
        self.canonical
    }

    /// Every background-like color observed, canonical included.
    pub fn colors(&self) -> &BTreeSet<Rgb> {
        &self.colors
    }

    /// Observed colors other than the canonical one.
    pub fn variants(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.colors.iter().copied().filter(move |&c| c != self.canonical)
    }
}

/// Samples border strips and corner squares of a mask.
#[derive(Debug, Clone)]
pub struct BackgroundColorResolver {
    regions: Vec<SampleRegion>,
    lines: u32,
}

impl BackgroundColorResolver {
    /// # Errors
    ///
    /// [`TissueError::NoSampleRegions`] when every flag is off and
    /// [`TissueError::InvalidLines`] when `lines` is 0.
    pub fn new(borders: BorderFlags, corners: CornerFlags, lines: u32) -> TissueResult<Self> {
        if lines == 0 {
            return Err(TissueError::InvalidLines);
        }
        let regions = enabled_regions(&borders, &corners);
        if regions.is_empty() {
            return Err(TissueError::NoSampleRegions);
        }
        Ok(Self { regions, lines })
    }

    /// The regions this resolver samples.
    pub fn regions(&self) -> &[SampleRegion] {
        &self.regions
    }

    /// Collect the colors present in every enabled region of `mask`.
    pub fn resolve(&self, mask: &Raster) -> TissueResult<Background> {
        let (width, height) = mask.dimensions();
        let mut colors = BTreeSet::new();
        for region in &self.regions {
            let rect = region.rect(width, height, self.lines);
            colors.extend(mask.unique_colors_in(&rect)?);
        }
        // A non-empty region of a valid raster always yields a color
        Background::from_colors(colors).ok_or(TissueError::NoSampleRegions)
    }
}

/// Fold every background variant into the canonical color.
///
/// Returns the consolidated mask and the number of pixels rewritten.
/// Consolidating an already-consolidated mask rewrites nothing.
pub fn consolidate_mask(mask: Raster, background: &Background) -> (Raster, u64) {
    let mut variants = background.variants().peekable();
    if variants.peek().is_none() {
        return (mask, 0);
    }
    let mut mask = mask.into_mut();
    let replaced: u64 = variants
        .map(|variant| mask.replace_color(variant, background.canonical()))
        .sum();
    (mask.into(), replaced)
}
