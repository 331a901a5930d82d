//! Row and column insertion/removal with span repair.
//!
//! Every edit resizes the region arrays first, then the span matrix through
//! `line_changed`, then prunes empty regions and runs the validator hook.
//!
//! Insertion grows every merge running through the new line in place, so
//! an anchor on that line keeps its position. Removal drops a merge whose
//! extent along the edited axis is 1 instead of shrinking it to nothing.
//! Removing and then re-inserting a line at the same index therefore does
//! not always give back the original merges.

use std::sync::Arc;

use crate::types::{Axis, CellBinding, SpanAnchor};

use super::grid::LayoutGrid;
use super::region::Region;

/// Outcome of a row removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRemoval {
    /// The row was deleted.
    Removed,
    /// The row was the last one of a non-virtual region and `force` was
    /// not set: the region was hidden instead.
    Hidden,
    /// Unknown region or row; nothing changed.
    Ignored,
}

impl<B: CellBinding> LayoutGrid<B> {
    // ========================================================================
    // COLUMNS
    // ========================================================================

    /// Insert an empty column before `col` (0 ≤ col ≤ column_count).
    pub fn insert_column(&mut self, col: usize) -> bool {
        if col > self.column_count {
            return false;
        }
        tracing::debug!(col, "inserting column");
        self.column_count += 1;
        for region in &mut self.regions {
            region.insert_column(col);
        }
        self.line_changed(Axis::Column, col, true, true);
        self.finish_edit();
        true
    }

    /// Delete column `col` (0 ≤ col < column_count).
    pub fn remove_column(&mut self, col: usize) -> bool {
        if col >= self.column_count {
            return false;
        }
        tracing::debug!(col, "removing column");
        self.column_count -= 1;
        for region in &mut self.regions {
            region.remove_column(col);
        }
        self.line_changed(Axis::Column, col, false, true);
        self.finish_edit();
        true
    }

    /// Grow or shrink the layout to `count` columns at its right edge.
    pub fn set_column_count(&mut self, count: usize) {
        while self.column_count < count {
            let at = self.column_count;
            self.insert_column(at);
        }
        while self.column_count > count {
            let at = self.column_count - 1;
            self.remove_column(at);
        }
    }

    // ========================================================================
    // ROWS
    // ========================================================================

    /// Insert an empty row before global row `row`.
    ///
    /// `row == row_count(true)` appends to the last region.
    pub fn insert_row(&mut self, row: usize) -> bool {
        let total = self.row_count(true);
        let target = if row < total {
            self.convert_to_region_row(row, true)
        } else if row == total {
            self.regions
                .len()
                .checked_sub(1)
                .and_then(|last| self.regions.get(last).map(|r| (last, r.row_count())))
        } else {
            None
        };
        match target {
            Some((index, local)) => self.insert_region_row(index, local),
            None => false,
        }
    }

    /// Insert an empty row into region `index` before local row `local`
    /// (0 ≤ local ≤ region row count).
    pub fn insert_region_row(&mut self, index: usize, local: usize) -> bool {
        let Some(start) = self.region_start(index) else {
            return false;
        };
        let cols = self.column_count;
        let Some(region) = self.regions.get_mut(index) else {
            return false;
        };
        if !region.insert_row(local, cols) {
            return false;
        }
        tracing::debug!(region = index, local, "inserted row");
        self.line_changed(Axis::Row, start + local, true, true);
        self.finish_edit();
        true
    }

    /// Delete global row `row`. See [`Self::remove_region_row`].
    pub fn remove_row(&mut self, row: usize, force: bool) -> RowRemoval {
        match self.convert_to_region_row(row, true) {
            Some((index, local)) => self.remove_region_row(index, local, force),
            None => RowRemoval::Ignored,
        }
    }

    /// Delete local row `local` of region `index`.
    ///
    /// Without `force`, removing the only row of a non-virtual region hides
    /// the region and keeps the row.
    pub fn remove_region_row(&mut self, index: usize, local: usize, force: bool) -> RowRemoval {
        let Some(start) = self.region_start(index) else {
            return RowRemoval::Ignored;
        };
        let Some(region) = self.regions.get_mut(index) else {
            return RowRemoval::Ignored;
        };
        if local >= region.row_count() {
            return RowRemoval::Ignored;
        }
        if !force && !region.is_virtual() && region.row_count() == 1 {
            tracing::debug!(region = index, "hiding region instead of removing its last row");
            region.set_visible(false);
            return RowRemoval::Hidden;
        }
        region.remove_row(local);
        tracing::debug!(region = index, local, "removed row");
        self.line_changed(Axis::Row, start + local, false, true);
        if self.options.prune_empty_regions {
            self.remove_empty_regions();
        }
        self.finish_edit();
        RowRemoval::Removed
    }

    /// Resize region `index` to `rows` rows at its end.
    ///
    /// Shrinking never removes the last row of a region: a virtual region
    /// keeps one row, any other region is hidden.
    pub fn set_region_row_count(&mut self, index: usize, rows: usize) -> bool {
        let Some(region) = self.regions.get(index) else {
            return false;
        };
        let id = region.id();
        let floor = usize::from(region.is_virtual());
        let mut current = region.row_count();
        while current < rows {
            if !self.insert_region_row(index, current) {
                return false;
            }
            current += 1;
        }
        while current > rows.max(floor) {
            let Some(index) = self.region_index(id) else {
                break;
            };
            match self.remove_region_row(index, current - 1, false) {
                RowRemoval::Removed => current -= 1,
                RowRemoval::Hidden | RowRemoval::Ignored => break,
            }
        }
        true
    }

    /// Remove region `index` together with the span lines of its rows.
    ///
    /// Span lines are repaired after the region is gone and without the
    /// cell-helper hook, since surviving merges only shrink.
    pub fn remove_region(&mut self, index: usize) -> Option<Region<B>> {
        let start = self.region_start(index)?;
        if index >= self.regions.len() {
            return None;
        }
        let region = self.regions.remove(index);
        let rows = region.row_count();
        for local in (0..rows).rev() {
            self.line_changed(Axis::Row, start + local, false, false);
        }
        tracing::debug!(region = %region.path(), rows, "removed region");
        self.finish_edit();
        Some(region)
    }

    // ========================================================================
    // SPAN REPAIR
    // ========================================================================

    /// Keep the span matrix in step with a line inserted or removed at
    /// `index` along `axis`. With `reconcile` set, merges shrunk by a
    /// removal are stored back through the cell-helper hook.
    fn line_changed(&mut self, axis: Axis, index: usize, add: bool, reconcile: bool) {
        let crossing: Vec<SpanAnchor> = self
            .spans
            .anchors()
            .filter(|anchor| anchor.crosses(axis, index))
            .collect();

        if add {
            // Crossing anchors start at or before `index` and must not move
            for anchor in &crossing {
                self.spans.set_anchor(anchor.row, anchor.col, None);
            }
            self.spans.insert_line(axis, index);
            for anchor in &crossing {
                let grown = anchor.size.with_extent(axis, anchor.size.extent(axis) + 1);
                self.spans.set_anchor(anchor.row, anchor.col, grown);
            }
            return;
        }

        if index + 1 == self.spans.len(axis) {
            for anchor in &crossing {
                let shrunk = anchor.size.with_extent(axis, anchor.size.extent(axis) - 1);
                self.spans.set_anchor(anchor.row, anchor.col, shrunk);
            }
            self.spans.remove_line(axis, index);
            return;
        }

        for anchor in &crossing {
            self.spans.set_anchor(anchor.row, anchor.col, None);
        }
        self.spans.remove_line(axis, index);
        for anchor in crossing {
            let extent = anchor.size.extent(axis);
            if extent <= 1 {
                tracing::debug!(row = anchor.row, col = anchor.col, "dropping unit span");
                continue;
            }
            let Some(size) = anchor.size.with_extent(axis, extent - 1) else {
                continue;
            };
            if reconcile {
                self.apply_span(SpanAnchor { size, ..anchor });
            } else {
                self.spans.set_anchor(anchor.row, anchor.col, Some(size));
            }
        }
    }

    fn finish_edit(&mut self) {
        if self.options.validate_after_edit && !self.spans.is_degenerate() {
            let hooks = Arc::clone(&self.hooks);
            hooks.validate(self);
        }
    }
}
