//! Grid-space geometry: [`Point`] and [`Range`].
//!
//! All grid-space arithmetic is integer. World-space types live in
//! [`crate::world`].

use std::fmt;
use std::ops::{Add, Mul, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D integer cell coordinate. X grows right, Y grows forward (world +Z).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a point shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Absolute per-axis distance to `other`.
    #[inline]
    pub const fn abs_delta(self, other: Point) -> (i32, i32) {
        ((self.x - other.x).abs(), (self.y - other.y).abs())
    }

    /// The eight Chebyshev-distance-1 neighbours, column by column from
    /// (-1, -1) to (1, 1).
    #[inline]
    pub fn neighbors_8(self) -> [Point; 8] {
        [
            self.shift(-1, -1),
            self.shift(-1, 0),
            self.shift(-1, 1),
            self.shift(0, -1),
            self.shift(0, 1),
            self.shift(1, -1),
            self.shift(1, 0),
            self.shift(1, 1),
        ]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Point {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open rectangle \[min, max) of cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// Create a new range from two corners, canonicalized so that
    /// `min` ≤ `max` on each axis.
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// The range `[0, width) × [0, height)`.
    #[inline]
    pub fn with_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width.max(0), height.max(0))
    }

    /// Size as a `Point` (width, height).
    #[inline]
    pub fn size(self) -> Point {
        Point::new(self.width(), self.height())
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    /// Total number of cells in the range.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width() as usize) * (self.height() as usize)
    }

    /// Whether the range has zero or negative area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Whether `p` is inside the half-open range.
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Snap `p` to the nearest cell inside the range.
    ///
    /// The range must not be empty.
    #[inline]
    pub fn clamp(self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.min.x, self.max.x - 1),
            p.y.clamp(self.min.y, self.max.y - 1),
        )
    }

    /// Row-major iterator over every point in the range.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            next: 0,
            len: self.len(),
        }
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;
    #[inline]
    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// RangeIter
// ---------------------------------------------------------------------------

/// Row-major iterator over the points in a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    next: usize,
    len: usize,
}

impl Iterator for RangeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.next >= self.len {
            return None;
        }
        let w = self.range.width() as usize;
        let (dx, dy) = (self.next % w, self.next / w);
        self.next += 1;
        Some(self.range.min.shift(dx as i32, dy as i32))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.len - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for RangeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1, 2);
        let b = Point::new(3, 4);
        assert_eq!(a + b, Point::new(4, 6));
        assert_eq!(b - a, Point::new(2, 2));
        assert_eq!(a * 3, Point::new(3, 6));
        assert_eq!(a.abs_delta(b), (2, 2));
    }

    #[test]
    fn neighbors_8_excludes_center() {
        let p = Point::new(5, 5);
        let n = p.neighbors_8();
        assert!(!n.contains(&p));
        for q in n {
            let (dx, dy) = q.abs_delta(p);
            assert!(dx <= 1 && dy <= 1);
        }
    }

    #[test]
    fn range_basics() {
        let r = Range::new(0, 0, 3, 2);
        assert_eq!(r.size(), Point::new(3, 2));
        assert_eq!(r.len(), 6);
        assert!(!r.is_empty());
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(2, 1)));
        assert!(!r.contains(Point::new(3, 0)));
        assert!(!r.contains(Point::new(0, 2)));
    }

    #[test]
    fn range_auto_canonicalize() {
        let r = Range::new(3, 2, 0, 0);
        assert_eq!(r.min, Point::new(0, 0));
        assert_eq!(r.max, Point::new(3, 2));
    }

    #[test]
    fn range_clamp_snaps_to_edge() {
        let r = Range::with_size(4, 3);
        assert_eq!(r.clamp(Point::new(-5, 1)), Point::new(0, 1));
        assert_eq!(r.clamp(Point::new(9, 9)), Point::new(3, 2));
        assert_eq!(r.clamp(Point::new(2, 2)), Point::new(2, 2));
    }

    #[test]
    fn range_iter_row_major() {
        let r = Range::new(0, 0, 3, 2);
        let pts: Vec<_> = r.iter().collect();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], Point::new(0, 0));
        assert_eq!(pts[3], Point::new(0, 1));
        assert_eq!(pts[5], Point::new(2, 1));
        assert_eq!(r.iter().len(), 6);
    }

    #[test]
    fn empty_range_iter() {
        let r = Range::with_size(0, 4);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.iter().count(), 0);
    }
}
