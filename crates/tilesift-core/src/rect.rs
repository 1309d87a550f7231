//! Rect - Rectangle regions
//!
//! Axis-aligned rectangles in pixel coordinates. A rectangle covers the
//! half-open ranges `x..x + w` and `y..y + h`.

use crate::error::{Error, Result};

/// A rectangle region
///
/// A simple `Copy` type since it is small and frequently copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left x coordinate
    pub x: u32,
    /// Top y coordinate
    pub y: u32,
    /// Width
    pub w: u32,
    /// Height
    pub h: u32,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle anchored at the origin.
    pub const fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// Get the area
    #[inline]
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Check if the rectangle is empty (zero area)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Check if a point is inside the rectangle
    #[inline]
    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle contains another rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check if this rectangle overlaps with another
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Compute the intersection of two rectangles
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect {
                x,
                y,
                w: right - x,
                h: bottom - y,
            })
        } else {
            None
        }
    }

    /// Require that this rectangle is non-empty and lies inside a
    /// `width x height` image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegionOutOfBounds`] otherwise.
    pub fn check_within(&self, width: u32, height: u32) -> Result<()> {
        let inside = !self.is_empty()
            && u64::from(self.x) + u64::from(self.w) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.h) <= u64::from(height);
        if inside {
            Ok(())
        } else {
            Err(Error::RegionOutOfBounds {
                x: self.x,
                y: self.y,
                w: self.w,
                h: self.h,
                width,
                height,
            })
        }
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.w, self.h, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.area(), 1200);
        assert!(!r.is_empty());
        assert!(Rect::new(0, 0, 0, 5).is_empty());
    }

    #[test]
    fn test_contains_point() {
        let r = Rect::new(0, 0, 4, 4);
        assert!(r.contains_point(0, 0));
        assert!(r.contains_point(3, 3));
        assert!(!r.contains_point(4, 3));
    }

    #[test]
    fn test_overlaps_and_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        let c = Rect::new(10, 0, 5, 5);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn test_check_within() {
        assert!(Rect::new(0, 0, 10, 10).check_within(10, 10).is_ok());
        assert!(Rect::new(1, 0, 10, 10).check_within(10, 10).is_err());
        assert!(Rect::new(0, 0, 0, 10).check_within(10, 10).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Rect::new(1, 2, 3, 4).to_string(), "3x4+1+2");
    }
}
