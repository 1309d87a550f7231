//! Border and corner sample regions
//!
//! Background is inferred from strips along the mask edges and squares in
//! its corners, which are assumed to hold no tissue. Each region is
//! enabled by one character of a 4-character flag string.

use crate::{TissueError, TissueResult};
use std::fmt;
use std::str::FromStr;
use tilesift_core::Rect;

fn parse_flags(s: &str) -> TissueResult<[bool; 4]> {
    let bytes = s.as_bytes();
    if bytes.len() != 4 {
        return Err(TissueError::InvalidFlags(s.to_string()));
    }
    let mut flags = [false; 4];
    for (flag, &b) in flags.iter_mut().zip(bytes) {
        *flag = match b {
            b'0' => false,
            b'1' => true,
            _ => return Err(TissueError::InvalidFlags(s.to_string())),
        };
    }
    Ok(flags)
}

fn write_flags(f: &mut fmt::Formatter<'_>, flags: [bool; 4]) -> fmt::Result {
    for flag in flags {
        f.write_str(if flag { "1" } else { "0" })?;
    }
    Ok(())
}

/// Edge strips to sample, in `top/left/bottom/right` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BorderFlags {
    pub top: bool,
    pub left: bool,
    pub bottom: bool,
    pub right: bool,
}

impl BorderFlags {
    pub fn any(&self) -> bool {
        self.top || self.left || self.bottom || self.right
    }
}

impl FromStr for BorderFlags {
    type Err = TissueError;

    fn from_str(s: &str) -> TissueResult<Self> {
        let [top, left, bottom, right] = parse_flags(s)?;
        Ok(Self {
            top,
            left,
            bottom,
            right,
        })
    }
}

impl fmt::Display for BorderFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_flags(f, [self.top, self.left, self.bottom, self.right])
    }
}

/// Corner squares to sample, in
/// `top-left/bottom-left/bottom-right/top-right` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CornerFlags {
    pub top_left: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
    pub top_right: bool,
}

impl CornerFlags {
    pub fn any(&self) -> bool {
        self.top_left || self.bottom_left || self.bottom_right || self.top_right
    }
}

impl FromStr for CornerFlags {
    type Err = TissueError;

    fn from_str(s: &str) -> TissueResult<Self> {
        let [top_left, bottom_left, bottom_right, top_right] = parse_flags(s)?;
        Ok(Self {
            top_left,
            bottom_left,
            bottom_right,
            top_right,
        })
    }
}

impl fmt::Display for CornerFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_flags(
            f,
            [self.top_left, self.bottom_left, self.bottom_right, self.top_right],
        )
    }
}

/// One sampled area of the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleRegion {
    Top,
    Left,
    Bottom,
    Right,
    TopLeft,
    BottomLeft,
    BottomRight,
    TopRight,
}

impl SampleRegion {
    /// Every region, borders first then corners.
    pub const ALL: [SampleRegion; 8] = [
        Self::Top,
        Self::Left,
        Self::Bottom,
        Self::Right,
        Self::TopLeft,
        Self::BottomLeft,
        Self::BottomRight,
        Self::TopRight,
    ];

    /// Whether this region is switched on by the given flags.
    pub fn enabled(self, borders: &BorderFlags, corners: &CornerFlags) -> bool {
        match self {
            Self::Top => borders.top,
            Self::Left => borders.left,
            Self::Bottom => borders.bottom,
            Self::Right => borders.right,
            Self::TopLeft => corners.top_left,
            Self::BottomLeft => corners.bottom_left,
            Self::BottomRight => corners.bottom_right,
            Self::TopRight => corners.top_right,
        }
    }

    /// Rectangle covered by this region on a `width` x `height` mask.
    ///
    /// Strips are `lines` deep and corners `lines` square; both are
    /// clamped to the mask so thick samples on small masks stay valid.
    pub fn rect(self, width: u32, height: u32, lines: u32) -> Rect {
        let lw = lines.min(width);
        let lh = lines.min(height);
        let (right, bottom) = (width - lw, height - lh);
        match self {
            Self::Top => Rect::new(0, 0, width, lh),
            Self::Left => Rect::new(0, 0, lw, height),
            Self::Bottom => Rect::new(0, bottom, width, lh),
            Self::Right => Rect::new(right, 0, lw, height),
            Self::TopLeft => Rect::new(0, 0, lw, lh),
            Self::BottomLeft => Rect::new(0, bottom, lw, lh),
            Self::BottomRight => Rect::new(right, bottom, lw, lh),
            Self::TopRight => Rect::new(right, 0, lw, lh),
        }
    }
}

/// The regions enabled by a pair of flag sets, in [`SampleRegion::ALL`]
/// order.
pub fn enabled_regions(borders: &BorderFlags, corners: &CornerFlags) -> Vec<SampleRegion> {
    SampleRegion::ALL
        .into_iter()
        .filter(|region| region.enabled(borders, corners))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let b: BorderFlags = "1001".parse().unwrap();
        assert!(b.top && !b.left && !b.bottom && b.right);
        assert_eq!(b.to_string(), "1001");

        let c: CornerFlags = "0100".parse().unwrap();
        assert!(c.bottom_left && !c.top_left && c.any());
        assert_eq!(c.to_string(), "0100");

        assert!(!"0000".parse::<BorderFlags>().unwrap().any());
    }

    #[test]
    fn test_parse_flags_rejects() {
        for bad in ["", "100", "10000", "10a0", "1 00"] {
            assert!(
                matches!(bad.parse::<BorderFlags>(), Err(TissueError::InvalidFlags(_))),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_region_rects() {
        let (w, h) = (20, 10);
        assert_eq!(SampleRegion::Top.rect(w, h, 3), Rect::new(0, 0, 20, 3));
        assert_eq!(SampleRegion::Left.rect(w, h, 3), Rect::new(0, 0, 3, 10));
        assert_eq!(SampleRegion::Bottom.rect(w, h, 3), Rect::new(0, 7, 20, 3));
        assert_eq!(SampleRegion::Right.rect(w, h, 3), Rect::new(17, 0, 3, 10));
        assert_eq!(SampleRegion::TopLeft.rect(w, h, 3), Rect::new(0, 0, 3, 3));
        assert_eq!(SampleRegion::BottomLeft.rect(w, h, 3), Rect::new(0, 7, 3, 3));
        assert_eq!(SampleRegion::BottomRight.rect(w, h, 3), Rect::new(17, 7, 3, 3));
        assert_eq!(SampleRegion::TopRight.rect(w, h, 3), Rect::new(17, 0, 3, 3));
    }

    #[test]
    fn test_region_rect_clamped() {
        for region in SampleRegion::ALL {
            let r = region.rect(4, 2, 50);
            assert_eq!(r, Rect::new(0, 0, 4, 2), "{:?}", region);
        }
    }

    #[test]
    fn test_enabled_regions() {
        let borders: BorderFlags = "1000".parse().unwrap();
        let corners: CornerFlags = "0010".parse().unwrap();
        assert_eq!(
            enabled_regions(&borders, &corners),
            vec![SampleRegion::Top, SampleRegion::BottomRight]
        );
        assert!(enabled_regions(&BorderFlags::default(), &CornerFlags::default()).is_empty());
    }
}
