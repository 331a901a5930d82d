//! Span geometry: anchor sizes and relative rectangles.

use serde::Serialize;

/// Extent of a merge, stored at its anchor cell.
///
/// Both dimensions are at least 1; a merge of a single cell is still a
/// valid entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SpanSize {
    width: usize,
    height: usize,
}

impl SpanSize {
    /// Create a span size. Returns `None` if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    /// Number of columns covered.
    #[must_use]
    pub fn width(self) -> usize {
        self.width
    }

    /// Number of rows covered.
    #[must_use]
    pub fn height(self) -> usize {
        self.height
    }

    /// Extent along `axis`.
    #[must_use]
    pub fn extent(self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.height,
            Axis::Column => self.width,
        }
    }

    /// Same span with the extent along `axis` replaced.
    pub fn with_extent(self, axis: Axis, extent: usize) -> Option<Self> {
        match axis {
            Axis::Row => Self::new(self.width, extent),
            Axis::Column => Self::new(extent, self.height),
        }
    }
}

/// A span seen from one of the cells it covers.
///
/// `x`/`y` are the (non-positive) offsets to the anchor; `width`/`height`
/// are the remaining extents from the queried cell to the bottom-right
/// corner, inclusive of the queried cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpanRect {
    pub x: isize,
    pub y: isize,
    pub width: usize,
    pub height: usize,
}

impl SpanRect {
    /// True if the queried cell is the anchor itself.
    #[must_use]
    pub fn is_anchor(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// A stored anchor with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpanAnchor {
    pub row: usize,
    pub col: usize,
    pub size: SpanSize,
}

impl SpanAnchor {
    /// First line covered along `axis`.
    #[must_use]
    pub fn start(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.row,
            Axis::Column => self.col,
        }
    }

    /// True if the anchor's rectangle passes through `line` on `axis`.
    #[must_use]
    pub fn crosses(&self, axis: Axis, line: usize) -> bool {
        let start = self.start(axis);
        start <= line && line < start.saturating_add(self.size.extent(axis))
    }

    /// True if the rectangle contains the cell.
    #[must_use]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.crosses(Axis::Row, row) && self.crosses(Axis::Column, col)
    }

    /// True if two rectangles share at least one cell.
    #[must_use]
    pub fn intersects(&self, other: &SpanAnchor) -> bool {
        let overlaps = |axis: Axis| {
            let a0 = self.start(axis);
            let a1 = a0.saturating_add(self.size.extent(axis));
            let b0 = other.start(axis);
            let b1 = b0.saturating_add(other.size.extent(axis));
            a0 < b1 && b0 < a1
        };
        overlaps(Axis::Row) && overlaps(Axis::Column)
    }
}

/// Grid axis an edit runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sizes_are_rejected() {
        assert!(SpanSize::new(0, 1).is_none());
        assert!(SpanSize::new(1, 0).is_none());
        assert!(SpanSize::new(1, 1).is_some());
    }

    #[test]
    fn test_with_extent() {
        let size = SpanSize::new(2, 3).unwrap();
        assert_eq!(size.with_extent(Axis::Row, 1), SpanSize::new(2, 1));
        assert_eq!(size.with_extent(Axis::Column, 0), None);
    }

    #[test]
    fn test_anchor_contains() {
        let anchor = SpanAnchor {
            row: 1,
            col: 1,
            size: SpanSize::new(2, 2).unwrap(),
        };
        assert!(anchor.contains(1, 1));
        assert!(anchor.contains(2, 2));
        assert!(!anchor.contains(3, 1));
        assert!(!anchor.contains(0, 1));
    }

    #[test]
    fn test_anchor_intersects() {
        let a = SpanAnchor {
            row: 0,
            col: 0,
            size: SpanSize::new(2, 2).unwrap(),
        };
        let b = SpanAnchor {
            row: 1,
            col: 1,
            size: SpanSize::new(1, 1).unwrap(),
        };
        let c = SpanAnchor {
            row: 0,
            col: 2,
            size: SpanSize::new(1, 3).unwrap(),
        };
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
