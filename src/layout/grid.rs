//! The layout container: ordered regions, the span matrix and the column
//! count, plus translation between global and region-local rows.
//!
//! Global rows are the concatenation of every region's rows in order.
//! The span matrix is addressed in global rows with hidden regions
//! included, so every row-addressed operation here does the same.

use std::sync::Arc;

use crate::error::{LayoutError, Result};
use crate::types::{Axis, CellBinding, DataPath, SpanAnchor, SpanRect, SpanSize};

use super::hooks::{DefaultHooks, LayoutHooks};
use super::region::{Region, RegionId};
use super::span_matrix::SpanMatrix;

/// Edit-time behaviour of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Run the validator hook after every structural edit.
    pub validate_after_edit: bool,
    /// Drop regions left with zero rows after a row removal.
    pub prune_empty_regions: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            validate_after_edit: true,
            prune_empty_regions: true,
        }
    }
}

/// A report table's grid: regions, cell bindings and merged-cell spans.
///
/// Invariants between public calls:
/// - the span matrix has `row_count(true)` rows and `column_count()` columns
/// - every region's binding grid is `region.row_count() × column_count()`
pub struct LayoutGrid<B: CellBinding> {
    pub(super) column_count: usize,
    pub(super) regions: Vec<Region<B>>,
    pub(super) spans: SpanMatrix,
    pub(super) hooks: Arc<dyn LayoutHooks<B>>,
    pub(super) options: LayoutOptions,
    next_region_id: u64,
}

impl<B: CellBinding + Default> LayoutGrid<B> {
    /// Empty layout with the default hooks.
    pub fn new() -> Self {
        Self::with_hooks(Arc::new(DefaultHooks))
    }
}

impl<B: CellBinding + Default> Default for LayoutGrid<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: CellBinding> std::fmt::Debug for LayoutGrid<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutGrid")
            .field("column_count", &self.column_count)
            .field("regions", &self.regions)
            .field("spans", &self.spans)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<B: CellBinding> LayoutGrid<B> {
    /// Empty layout driven by a layout kind's hooks.
    pub fn with_hooks(hooks: Arc<dyn LayoutHooks<B>>) -> Self {
        Self {
            column_count: 0,
            regions: Vec::new(),
            spans: SpanMatrix::default(),
            hooks,
            options: LayoutOptions::default(),
            next_region_id: 0,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> LayoutOptions {
        self.options
    }

    pub fn set_options(&mut self, options: LayoutOptions) {
        self.options = options;
    }

    #[must_use]
    pub fn hooks(&self) -> &Arc<dyn LayoutHooks<B>> {
        &self.hooks
    }

    /// Drop every region and span. The column count is kept.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.spans = SpanMatrix::new(0, self.column_count);
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    // ========================================================================
    // REGIONS
    // ========================================================================

    #[must_use]
    pub fn regions(&self) -> &[Region<B>] {
        &self.regions
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn region(&self, index: usize) -> Option<&Region<B>> {
        self.regions.get(index)
    }

    /// Position of a region in the layout, if it is still there.
    #[must_use]
    pub fn region_index(&self, id: RegionId) -> Option<usize> {
        self.regions.iter().position(|r| r.id() == id)
    }

    /// First region whose normalized path equals `path`.
    #[must_use]
    pub fn find_region(&self, path: &DataPath) -> Option<usize> {
        let path = self.hooks.fix_path_for_region(path);
        self.regions.iter().position(|r| *r.path() == path)
    }

    /// Append a region with `rows` empty rows.
    pub fn add_region(&mut self, path: &DataPath, rows: usize) -> RegionId {
        let at = self.regions.len();
        let id = self.allocate_region_id();
        self.place_region(at, id, path, rows);
        id
    }

    /// Insert a region before position `at` (0 ≤ at ≤ region_count).
    ///
    /// Existing spans shift down with the rows after the new band; a span
    /// running across the insertion point does not grow into the band.
    pub fn insert_region(&mut self, at: usize, path: &DataPath, rows: usize) -> Option<RegionId> {
        if at > self.regions.len() {
            return None;
        }
        let id = self.allocate_region_id();
        self.place_region(at, id, path, rows);
        Some(id)
    }

    fn allocate_region_id(&mut self) -> RegionId {
        let id = RegionId(self.next_region_id);
        self.next_region_id += 1;
        id
    }

    fn place_region(&mut self, at: usize, id: RegionId, path: &DataPath, rows: usize) {
        let start = self.region_start(at).unwrap_or_else(|| self.row_count(true));
        let path = self.hooks.fix_path_for_region(path);
        tracing::debug!(region = %path, at, rows, "adding region");
        for _ in 0..rows {
            self.spans.insert_line(Axis::Row, start);
        }
        self.regions
            .insert(at, Region::new(id, path, rows, self.column_count));
    }

    pub fn set_region_visible(&mut self, index: usize, visible: bool) -> bool {
        match self.regions.get_mut(index) {
            Some(region) => {
                region.set_visible(visible);
                true
            }
            None => false,
        }
    }

    pub fn set_region_virtual(&mut self, index: usize, is_virtual: bool) -> bool {
        match self.regions.get_mut(index) {
            Some(region) => {
                region.set_virtual(is_virtual);
                true
            }
            None => false,
        }
    }

    pub fn set_region_path(&mut self, index: usize, path: &DataPath) -> bool {
        let path = self.hooks.fix_path_for_region(path);
        match self.regions.get_mut(index) {
            Some(region) => {
                region.set_path(path);
                true
            }
            None => false,
        }
    }

    /// Remove regions that have no rows, scanning from the last one.
    /// Returns how many were removed.
    pub fn remove_empty_regions(&mut self) -> usize {
        let mut removed = 0;
        for index in (0..self.regions.len()).rev() {
            if self.regions.get(index).is_some_and(|r| r.row_count() == 0) {
                self.regions.remove(index);
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!(removed, "pruned empty regions");
        }
        removed
    }

    // ========================================================================
    // COORDINATE TRANSLATION
    // ========================================================================

    /// Total rows, optionally skipping hidden regions.
    #[must_use]
    pub fn row_count(&self, include_hidden: bool) -> usize {
        self.regions
            .iter()
            .map(|r| r.row_count_if(include_hidden))
            .sum()
    }

    /// Global row of the first row of region `index`. `index == region_count`
    /// yields the total row count.
    #[must_use]
    pub fn region_start(&self, index: usize) -> Option<usize> {
        if index > self.regions.len() {
            return None;
        }
        Some(self.regions.iter().take(index).map(Region::row_count).sum())
    }

    /// Index of the region owning a global row.
    #[must_use]
    pub fn locate_region_index(&self, row: usize) -> Option<usize> {
        self.convert_to_region_row(row, true).map(|(index, _)| index)
    }

    /// The region owning a global row.
    #[must_use]
    pub fn locate_region(&self, row: usize) -> Option<&Region<B>> {
        self.locate_region_index(row)
            .and_then(|index| self.regions.get(index))
    }

    /// Translate a global row to `(region index, local row)`.
    ///
    /// With `include_hidden == false` the global row counts only rows of
    /// visible regions.
    #[must_use]
    pub fn convert_to_region_row(&self, row: usize, include_hidden: bool) -> Option<(usize, usize)> {
        let mut upper = 0usize;
        for (index, region) in self.regions.iter().enumerate() {
            let lower = upper;
            upper += region.row_count_if(include_hidden);
            if row < upper {
                return Some((index, row - lower));
            }
        }
        None
    }

    /// Translate a region-local row to a global row (hidden rows counted).
    #[must_use]
    pub fn convert_to_global_row(&self, index: usize, local: usize) -> Option<usize> {
        let region = self.regions.get(index)?;
        if local >= region.row_count() {
            return None;
        }
        self.region_start(index).map(|start| start + local)
    }

    // ========================================================================
    // CELL BINDINGS
    // ========================================================================

    fn resolve(&self, row: usize) -> Option<(&Region<B>, usize)> {
        let (index, local) = self.convert_to_region_row(row, true)?;
        self.regions.get(index).map(|r| (r, local))
    }

    fn resolve_mut(&mut self, row: usize) -> Option<(&mut Region<B>, usize)> {
        let (index, local) = self.convert_to_region_row(row, true)?;
        self.regions.get_mut(index).map(|r| (r, local))
    }

    /// The binding of a cell; absent for unknown rows or columns.
    #[must_use]
    pub fn cell_binding(&self, row: usize, col: usize) -> Option<Arc<B>> {
        let (region, local) = self.resolve(row)?;
        region.cell_binding(local, col).map(Arc::clone)
    }

    /// Store a binding; ignored for unknown rows or columns.
    pub fn set_cell_binding(&mut self, row: usize, col: usize, binding: Option<B>) -> bool {
        self.set_shared_cell_binding(row, col, binding.map(Arc::new))
    }

    /// Store an already shared binding.
    pub fn set_shared_cell_binding(&mut self, row: usize, col: usize, binding: Option<Arc<B>>) -> bool {
        self.resolve_mut(row)
            .is_some_and(|(region, local)| region.set_cell_binding(local, col, binding))
    }

    /// The binding of a cell, created through the hooks if the cell is
    /// empty. `None` for unknown cells.
    pub fn ensure_cell_binding(&mut self, row: usize, col: usize) -> Option<Arc<B>> {
        if col >= self.column_count {
            return None;
        }
        if let Some(existing) = self.cell_binding(row, col) {
            return Some(existing);
        }
        let created = Arc::new(self.hooks.create_cell_binding());
        self.set_shared_cell_binding(row, col, Some(Arc::clone(&created)))
            .then_some(created)
    }

    /// Explicit height of a row; `None` means auto.
    #[must_use]
    pub fn row_height(&self, row: usize) -> Option<u32> {
        self.resolve(row)
            .and_then(|(region, local)| region.row_height(local))
    }

    pub fn set_row_height(&mut self, row: usize, height: Option<u32>) -> bool {
        self.resolve_mut(row)
            .is_some_and(|(region, local)| region.set_row_height(local, height))
    }

    /// Base row a row maps to.
    #[must_use]
    pub fn row_base(&self, row: usize) -> Option<usize> {
        self.resolve(row)
            .and_then(|(region, local)| region.row_base(local))
    }

    pub fn set_row_base(&mut self, row: usize, base: Option<usize>) -> bool {
        self.resolve_mut(row)
            .is_some_and(|(region, local)| region.set_row_base(local, base))
    }

    // ========================================================================
    // SPANS
    // ========================================================================

    #[must_use]
    pub fn spans(&self) -> &SpanMatrix {
        &self.spans
    }

    /// Anchor access for collaborator hooks.
    pub fn spans_mut(&mut self) -> &mut SpanMatrix {
        &mut self.spans
    }

    /// The span stored at an anchor cell.
    #[must_use]
    pub fn span(&self, row: usize, col: usize) -> Option<SpanSize> {
        self.spans.get(row, col)
    }

    /// The merge covering a cell, relative to that cell.
    #[must_use]
    pub fn find_span(&self, row: usize, col: usize) -> Option<SpanRect> {
        self.spans.find_span(row, col)
    }

    /// True if the merge covering the cell runs past the end of the region
    /// that owns its anchor.
    #[must_use]
    pub fn has_cross_region_span(&self, row: usize, col: usize) -> bool {
        let Some(anchor) = self.spans.find_anchor(row, col) else {
            return false;
        };
        let Some((region, local)) = self.resolve(anchor.row) else {
            return false;
        };
        region.row_count() - local < anchor.size.height()
    }

    /// Store (`Some`) or clear (`None`) the merge anchored at (row, col).
    ///
    /// A new span first goes through the cell-helper hook so overlapping
    /// merges are reconciled.
    ///
    /// # Errors
    /// Returns [`LayoutError::SpanOutOfBounds`] if the rectangle does not
    /// fit the span matrix.
    pub fn set_span(&mut self, row: usize, col: usize, size: Option<SpanSize>) -> Result<()> {
        let Some(size) = size else {
            self.spans.set_anchor(row, col, None);
            return Ok(());
        };
        let anchor = SpanAnchor { row, col, size };
        if !self.spans.fits(&anchor) {
            return Err(LayoutError::SpanOutOfBounds {
                row,
                col,
                width: size.width(),
                height: size.height(),
                rows: self.spans.rows(),
                cols: self.spans.cols(),
            });
        }
        self.apply_span(anchor);
        Ok(())
    }

    /// Reconcile through the hooks, then store.
    pub(super) fn apply_span(&mut self, anchor: SpanAnchor) {
        let hooks = Arc::clone(&self.hooks);
        hooks.reconcile_span(self, anchor);
        self.spans
            .set_anchor(anchor.row, anchor.col, Some(anchor.size));
    }

    // ========================================================================
    // CLONE
    // ========================================================================

    /// Independent copy of the layout. Bindings are deep-copied when the
    /// payload supports it and shared otherwise.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        Self {
            column_count: self.column_count,
            regions: self.regions.iter().map(Region::deep_clone).collect(),
            spans: self.spans.deep_clone(),
            hooks: Arc::clone(&self.hooks),
            options: self.options,
            next_region_id: self.next_region_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::TextBinding;

    fn two_regions() -> LayoutGrid<TextBinding> {
        let mut grid = LayoutGrid::new();
        grid.set_column_count(2);
        grid.add_region(&DataPath::from("header"), 3);
        grid.add_region(&DataPath::from("detail"), 2);
        grid
    }

    #[test]
    fn test_row_count_and_translation() {
        let mut grid = two_regions();
        assert_eq!(grid.row_count(true), 5);
        assert_eq!(grid.convert_to_region_row(3, true), Some((1, 0)));
        assert_eq!(grid.convert_to_region_row(5, true), None);
        assert_eq!(grid.convert_to_global_row(1, 1), Some(4));
        assert_eq!(grid.convert_to_global_row(1, 2), None);
        assert_eq!(grid.locate_region(2).unwrap().path().as_str(), "header");

        grid.set_region_visible(0, false);
        assert_eq!(grid.row_count(false), 2);
        assert_eq!(grid.row_count(true), 5);
        assert_eq!(grid.convert_to_region_row(0, false), Some((1, 0)));
    }

    #[test]
    fn test_add_region_grows_span_matrix() {
        let grid = two_regions();
        assert_eq!(grid.spans().rows(), 5);
        assert_eq!(grid.spans().cols(), 2);
    }

    #[test]
    fn test_insert_region_shifts_spans() {
        let mut grid = two_regions();
        grid.set_span(3, 0, SpanSize::new(2, 1)).unwrap();
        let id = grid.insert_region(1, &DataPath::from("group"), 2).unwrap();
        assert_eq!(grid.region_index(id), Some(1));
        assert_eq!(grid.row_count(true), 7);
        assert_eq!(grid.span(5, 0), SpanSize::new(2, 1));
        assert!(grid.insert_region(9, &DataPath::from("x"), 1).is_none());
    }

    #[test]
    fn test_find_region_uses_normalized_path() {
        let grid = two_regions();
        assert_eq!(grid.find_region(&DataPath::from(" /detail/ ")), Some(1));
        assert_eq!(grid.find_region(&DataPath::from("footer")), None);
    }

    #[test]
    fn test_cell_binding_access() {
        let mut grid = two_regions();
        assert!(grid.set_cell_binding(4, 1, Some(TextBinding::new("=[Qty]"))));
        assert_eq!(grid.cell_binding(4, 1).unwrap().expression, "=[Qty]");
        assert!(grid.cell_binding(4, 7).is_none());
        assert!(!grid.set_cell_binding(9, 0, Some(TextBinding::new("x"))));
        assert!(grid.cell_binding(9, 0).is_none());
    }

    #[test]
    fn test_ensure_cell_binding_creates_once() {
        let mut grid = two_regions();
        let first = grid.ensure_cell_binding(0, 0).unwrap();
        let second = grid.ensure_cell_binding(0, 0).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(grid.ensure_cell_binding(0, 2).is_none());
    }

    #[test]
    fn test_row_height_and_base() {
        let mut grid = two_regions();
        assert!(grid.set_row_height(3, Some(24)));
        assert_eq!(grid.row_height(3), Some(24));
        assert_eq!(grid.row_height(4), None);
        assert!(grid.set_row_base(4, Some(1)));
        assert_eq!(grid.row_base(4), Some(1));
        assert!(!grid.set_row_height(10, Some(5)));
    }

    #[test]
    fn test_set_span_out_of_bounds_is_an_error() {
        let mut grid = two_regions();
        let err = grid.set_span(4, 1, SpanSize::new(2, 1)).unwrap_err();
        assert!(matches!(err, LayoutError::SpanOutOfBounds { .. }));
        assert_eq!(grid.spans().anchor_count(), 0);
    }

    #[test]
    fn test_set_span_evicts_overlaps() {
        let mut grid = two_regions();
        grid.set_span(0, 0, SpanSize::new(2, 2)).unwrap();
        grid.set_span(1, 1, SpanSize::new(1, 2)).unwrap();
        assert_eq!(grid.span(0, 0), None);
        assert_eq!(grid.span(1, 1), SpanSize::new(1, 2));
    }

    #[test]
    fn test_cross_region_span() {
        let mut grid = two_regions();
        grid.set_span(1, 0, SpanSize::new(1, 2)).unwrap();
        assert!(!grid.has_cross_region_span(2, 0));
        grid.set_span(2, 1, SpanSize::new(1, 2)).unwrap();
        assert!(grid.has_cross_region_span(3, 1));
        assert!(!grid.has_cross_region_span(4, 0));
    }

    #[test]
    fn test_clear_keeps_columns() {
        let mut grid = two_regions();
        grid.clear();
        assert_eq!(grid.region_count(), 0);
        assert_eq!(grid.row_count(true), 0);
        assert_eq!(grid.spans().rows(), 0);
        assert_eq!(grid.column_count(), 2);
    }

    #[test]
    fn test_remove_empty_regions_is_idempotent() {
        let mut grid = two_regions();
        grid.add_region(&DataPath::from("empty"), 0);
        grid.insert_region(0, &DataPath::from("empty2"), 0);
        assert_eq!(grid.remove_empty_regions(), 2);
        assert_eq!(grid.remove_empty_regions(), 0);
        assert_eq!(grid.region_count(), 2);
    }
}
