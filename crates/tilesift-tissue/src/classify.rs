//! Tissue classification
//!
//! A tile is kept when enough of its mask window differs from the
//! canonical background color. With threshold `t`, the tile is kept iff
//! `background_fraction <= 1 - t`: `t = 0` keeps everything and `t = 1`
//! keeps only tiles without a single background pixel.

use crate::{TissueError, TissueResult};
use std::fmt;
use tilesift_core::{Raster, Rect, Rgb};

/// Minimum tissue proportion for a tile to be kept, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> TissueResult<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TissueError::InvalidThreshold(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Threshold {
    type Error = TissueError;

    fn try_from(value: f64) -> TissueResult<Self> {
        Self::new(value)
    }
}

/// Outcome for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileDecision {
    Keep,
    Discard,
}

impl TileDecision {
    pub fn is_keep(self) -> bool {
        self == Self::Keep
    }

    /// `1` for keep, `0` for discard.
    pub fn as_flag(self) -> u8 {
        match self {
            Self::Keep => 1,
            Self::Discard => 0,
        }
    }
}

impl fmt::Display for TileDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_flag())
    }
}

/// Pixel counts behind a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub background_pixels: u64,
    pub total_pixels: u64,
    pub decision: TileDecision,
}

impl Classification {
    pub fn background_fraction(&self) -> f64 {
        self.background_pixels as f64 / self.total_pixels as f64
    }

    pub fn tissue_fraction(&self) -> f64 {
        1.0 - self.background_fraction()
    }
}

/// Decides keep/discard from a consolidated mask window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TissueClassifier {
    background: Rgb,
    threshold: Threshold,
}

impl TissueClassifier {
    pub fn new(background: Rgb, threshold: Threshold) -> Self {
        Self {
            background,
            threshold,
        }
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Decision for given background and total pixel counts.
    pub fn decide(&self, background_pixels: u64, total_pixels: u64) -> Classification {
        let fraction = if total_pixels == 0 {
            1.0
        } else {
            background_pixels as f64 / total_pixels as f64
        };
        let decision = if fraction <= 1.0 - self.threshold.value() {
            TileDecision::Keep
        } else {
            TileDecision::Discard
        };
        Classification {
            background_pixels,
            total_pixels,
            decision,
        }
    }

    /// Classify a whole raster as one window.
    pub fn classify(&self, window: &Raster) -> Classification {
        self.decide(window.count_matching(self.background), window.total_pixels())
    }

    /// Classify the window `rect` of a full-resolution mask without
    /// copying it.
    pub fn classify_region(&self, mask: &Raster, rect: &Rect) -> TissueResult<Classification> {
        let background = mask.count_matching_in(rect, self.background)?;
        Ok(self.decide(background, rect.area()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilesift_test::synth;

    fn classifier(t: f64) -> TissueClassifier {
        TissueClassifier::new(Rgb::WHITE, Threshold::new(t).unwrap())
    }

    #[test]
    fn test_threshold_range() {
        assert!(Threshold::new(0.0).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        assert!(matches!(Threshold::new(1.01), Err(TissueError::InvalidThreshold(_))));
        assert!(Threshold::new(-0.1).is_err());
        assert!(Threshold::try_from(f64::NAN).is_err());
    }

    #[test]
    fn test_half_tissue_boundary() {
        // 4x4 window, left half tissue
        let w = synth::painted(4, 4, Rgb::WHITE, &[(Rect::new(0, 0, 2, 4), synth::TISSUE)]);
        let c = classifier(0.5).classify(&w);
        assert_eq!(c.background_pixels, 8);
        assert_eq!(c.total_pixels, 16);
        assert_eq!(c.decision, TileDecision::Keep);
        assert_eq!(classifier(0.51).classify(&w).decision, TileDecision::Discard);
    }

    #[test]
    fn test_extreme_thresholds() {
        let all_bg = synth::solid(3, 3, Rgb::WHITE);
        let one_bg = synth::painted(3, 3, synth::TISSUE, &[(Rect::new(0, 0, 1, 1), Rgb::WHITE)]);
        let no_bg = synth::solid(3, 3, synth::TISSUE);

        assert!(classifier(0.0).classify(&all_bg).decision.is_keep());
        assert!(!classifier(1.0).classify(&one_bg).decision.is_keep());
        assert!(classifier(1.0).classify(&no_bg).decision.is_keep());
    }

    #[test]
    fn test_classify_region() {
        let mask = synth::painted(10, 10, Rgb::WHITE, &[(Rect::new(5, 5, 5, 5), synth::TISSUE)]);
        let c = classifier(0.9)
            .classify_region(&mask, &Rect::new(5, 5, 5, 5))
            .unwrap();
        assert_eq!(c.background_pixels, 0);
        assert!(c.decision.is_keep());
        assert_eq!(c.tissue_fraction(), 1.0);

        assert!(classifier(0.5).classify_region(&mask, &Rect::new(8, 8, 5, 5)).is_err());
    }

    #[test]
    fn test_decision_flag() {
        assert_eq!(TileDecision::Keep.as_flag(), 1);
        assert_eq!(TileDecision::Discard.to_string(), "0");
    }
}
