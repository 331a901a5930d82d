//! Sparse matrix of merge anchors.
//!
//! A stored entry at (r, c) is always the top-left anchor of a merge.
//! Interior cells hold nothing; their coverage is found by scanning for an
//! anchor whose rectangle contains them.

use crate::sizing::{self, Matrix};
use crate::types::{Axis, SpanAnchor, SpanRect, SpanSize};

/// Anchor storage sized exactly `rows × cols`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpanMatrix {
    cells: Matrix<SpanSize>,
    rows: usize,
    cols: usize,
}

impl SpanMatrix {
    /// Create an empty matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: sizing::new_matrix(rows, cols),
            rows,
            cols,
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of lines along `axis`.
    #[must_use]
    pub fn len(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.rows,
            Axis::Column => self.cols,
        }
    }

    /// True if either dimension is zero.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// The anchor entry stored exactly at (row, col).
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<SpanSize> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// Store or clear the anchor entry at (row, col). Collaborators may edit
    /// anchors but never the dimensions.
    ///
    /// Returns `false` without touching the matrix if the cell is outside it.
    pub fn set_anchor(&mut self, row: usize, col: usize, size: Option<SpanSize>) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(slot) => {
                *slot = size;
                true
            }
            None => false,
        }
    }

    /// All stored anchors in row-major order.
    pub fn anchors(&self) -> impl Iterator<Item = SpanAnchor> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| {
                cell.map(|size| SpanAnchor { row, col, size })
            })
        })
    }

    /// Number of stored anchors.
    #[must_use]
    pub fn anchor_count(&self) -> usize {
        self.anchors().count()
    }

    /// The anchor whose rectangle covers (row, col), if any.
    #[must_use]
    pub fn find_anchor(&self, row: usize, col: usize) -> Option<SpanAnchor> {
        self.anchors().find(|anchor| anchor.contains(row, col))
    }

    /// Describe the merge covering (row, col) relative to that cell.
    ///
    /// `x`/`y` point back to the anchor; `width`/`height` are what remains
    /// of the merge from the queried cell onwards.
    #[must_use]
    pub fn find_span(&self, row: usize, col: usize) -> Option<SpanRect> {
        let anchor = self.find_anchor(row, col)?;
        let dx = col - anchor.col;
        let dy = row - anchor.row;
        Some(SpanRect {
            x: negative_offset(dx),
            y: negative_offset(dy),
            width: anchor.size.width() - dx,
            height: anchor.size.height() - dy,
        })
    }

    /// True if the anchor's whole rectangle lies inside the matrix.
    #[must_use]
    pub fn fits(&self, anchor: &SpanAnchor) -> bool {
        anchor.row.saturating_add(anchor.size.height()) <= self.rows
            && anchor.col.saturating_add(anchor.size.width()) <= self.cols
    }

    /// Insert an empty line before `at` (0 ≤ at ≤ len).
    pub(crate) fn insert_line(&mut self, axis: Axis, at: usize) {
        if at > self.len(axis) {
            return;
        }
        let cells = std::mem::take(&mut self.cells);
        match axis {
            Axis::Row => {
                self.cells = sizing::insert_row(cells, at, self.cols);
                self.rows += 1;
            }
            Axis::Column => {
                self.cells = sizing::insert_column(cells, at);
                self.cols += 1;
            }
        }
    }

    /// Delete line `at` (0 ≤ at < len) along with any anchor stored on it.
    pub(crate) fn remove_line(&mut self, axis: Axis, at: usize) {
        if at >= self.len(axis) {
            return;
        }
        let cells = std::mem::take(&mut self.cells);
        match axis {
            Axis::Row => {
                self.cells = sizing::remove_row(cells, at);
                self.rows -= 1;
            }
            Axis::Column => {
                self.cells = sizing::remove_column(cells, at);
                self.cols -= 1;
            }
        }
    }

    /// Deep copy through the sizing helpers.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        Self {
            cells: sizing::deep_clone(&self.cells, |size| *size),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

fn negative_offset(distance: usize) -> isize {
    isize::try_from(distance).map_or(isize::MIN, |d| -d)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn size(width: usize, height: usize) -> Option<SpanSize> {
        SpanSize::new(width, height)
    }

    #[test]
    fn test_new_matrix_is_empty() {
        let m = SpanMatrix::new(3, 4);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 4);
        assert_eq!(m.anchor_count(), 0);
        assert!(!m.is_degenerate());
        assert!(SpanMatrix::new(0, 4).is_degenerate());
    }

    #[test]
    fn test_store_out_of_bounds_is_rejected() {
        let mut m = SpanMatrix::new(2, 2);
        assert!(!m.set_anchor(2, 0, size(1, 1)));
        assert!(!m.set_anchor(0, 2, size(1, 1)));
        assert!(m.set_anchor(1, 1, size(1, 1)));
        assert_eq!(m.get(1, 1), size(1, 1));
    }

    #[test]
    fn test_find_span_from_interior_cell() {
        let mut m = SpanMatrix::new(3, 3);
        m.set_anchor(0, 0, size(2, 2));

        let rect = m.find_span(1, 1).unwrap();
        assert_eq!(
            rect,
            SpanRect {
                x: -1,
                y: -1,
                width: 1,
                height: 1
            }
        );
        assert!(m.find_span(0, 0).unwrap().is_anchor());
        assert_eq!(m.find_span(2, 2), None);
    }

    #[test]
    fn test_find_span_remaining_extent() {
        let mut m = SpanMatrix::new(4, 4);
        m.set_anchor(1, 0, size(3, 3));

        let rect = m.find_span(2, 1).unwrap();
        assert_eq!(rect.x, -1);
        assert_eq!(rect.y, -1);
        assert_eq!(rect.width, 2);
        assert_eq!(rect.height, 2);
    }

    #[test]
    fn test_insert_line_shifts_anchors() {
        let mut m = SpanMatrix::new(2, 2);
        m.set_anchor(1, 1, size(1, 1));

        m.insert_line(Axis::Row, 0);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.get(2, 1), size(1, 1));

        m.insert_line(Axis::Column, 1);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.get(2, 2), size(1, 1));
    }

    #[test]
    fn test_remove_line_drops_anchor_on_line() {
        let mut m = SpanMatrix::new(3, 3);
        m.set_anchor(1, 1, size(1, 1));
        m.set_anchor(2, 2, size(1, 1));

        m.remove_line(Axis::Row, 1);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.anchor_count(), 1);
        assert_eq!(m.get(1, 2), size(1, 1));
    }

    #[test]
    fn test_out_of_range_lines_are_ignored() {
        let mut m = SpanMatrix::new(2, 2);
        m.insert_line(Axis::Row, 3);
        m.remove_line(Axis::Column, 2);
        assert_eq!((m.rows(), m.cols()), (2, 2));
    }

    #[test]
    fn test_fits() {
        let m = SpanMatrix::new(2, 2);
        let inside = SpanAnchor {
            row: 0,
            col: 0,
            size: SpanSize::new(2, 2).unwrap(),
        };
        let outside = SpanAnchor {
            row: 1,
            col: 0,
            size: SpanSize::new(1, 2).unwrap(),
        };
        assert!(m.fits(&inside));
        assert!(!m.fits(&outside));
    }
}
