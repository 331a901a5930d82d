//! Layout equality in three strengths.
//!
//! Inside a merge only the anchor's binding counts; interior cells are
//! skipped unless every cell is requested.

use std::sync::Arc;

use crate::types::CellBinding;

use super::grid::LayoutGrid;
use super::region::Region;

/// How much of a layout takes part in [`LayoutGrid::equals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareMode {
    /// Regions, row attributes, bindings and every span slot.
    #[default]
    Full,
    /// Bindings and spans; row heights only where both sides set one.
    Content,
    /// What cells are bound to, ignoring presentation and spans.
    Binding,
}

impl<B: CellBinding> LayoutGrid<B> {
    /// Compare two layouts. With `all_cells == false` the non-anchor cells
    /// of a merge are not compared.
    #[must_use]
    pub fn equals(&self, other: &Self, mode: CompareMode, all_cells: bool) -> bool {
        if self.column_count != other.column_count
            || self.regions.len() != other.regions.len()
        {
            return false;
        }
        let regions_match = self
            .regions
            .iter()
            .zip(&other.regions)
            .all(|(a, b)| region_attributes_match(a, b, mode));
        if !regions_match {
            return false;
        }
        if mode != CompareMode::Binding && self.spans != other.spans {
            return false;
        }
        self.bindings_match(other, mode, all_cells)
    }

    fn bindings_match(&self, other: &Self, mode: CompareMode, all_cells: bool) -> bool {
        let rows = self.row_count(true);
        for row in 0..rows {
            for col in 0..self.column_count {
                if !all_cells && self.find_span(row, col).is_some_and(|s| !s.is_anchor()) {
                    continue;
                }
                let same = match (self.cell_binding(row, col), other.cell_binding(row, col)) {
                    (None, None) => true,
                    (Some(a), Some(b)) => binding_matches(&a, &b, mode),
                    _ => false,
                };
                if !same {
                    return false;
                }
            }
        }
        true
    }
}

fn region_attributes_match<B: CellBinding>(a: &Region<B>, b: &Region<B>, mode: CompareMode) -> bool {
    if a.row_count() != b.row_count() {
        return false;
    }
    let rows = a.row_count();
    match mode {
        CompareMode::Full => {
            a.path() == b.path()
                && a.is_visible() == b.is_visible()
                && a.is_virtual() == b.is_virtual()
                && (0..rows).all(|r| a.row_height(r) == b.row_height(r))
                && (0..rows).all(|r| a.row_base(r) == b.row_base(r))
        }
        CompareMode::Content => {
            a.path() == b.path()
                && a.is_visible() == b.is_visible()
                && (0..rows).all(|r| match (a.row_height(r), b.row_height(r)) {
                    (Some(x), Some(y)) => x == y,
                    _ => true,
                })
        }
        CompareMode::Binding => true,
    }
}

fn binding_matches<B: CellBinding>(a: &Arc<B>, b: &Arc<B>, mode: CompareMode) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }
    match mode {
        CompareMode::Full | CompareMode::Content => a.same_content(b),
        CompareMode::Binding => a.same_binding(b),
    }
}
