//! Common test utilities and assertion helpers.
//!
//! Layout builders plus checks for the structural invariants every public
//! edit must preserve.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use tablespan::{DataPath, LayoutGrid, SpanSize, TextBinding};

// ============================================================================
// Builders
// ============================================================================

/// Layout with one region per entry of `rows`, named `band0`, `band1`...
#[must_use]
pub fn layout(rows: &[usize], cols: usize) -> LayoutGrid<TextBinding> {
    let mut grid = LayoutGrid::new();
    grid.set_column_count(cols);
    for (i, &n) in rows.iter().enumerate() {
        grid.add_region(&DataPath::new(format!("band{i}")), n);
    }
    grid
}

/// Bind every cell to its own coordinates, e.g. `r1c2`.
pub fn bind_all(grid: &mut LayoutGrid<TextBinding>) {
    for row in 0..grid.row_count(true) {
        for col in 0..grid.column_count() {
            grid.set_cell_binding(row, col, Some(TextBinding::new(format!("r{row}c{col}"))));
        }
    }
}

/// A report-like layout: title, hidden group header, detail, footer with
/// spans, heights, base rows and formatted bindings.
#[must_use]
pub fn report_layout() -> LayoutGrid<TextBinding> {
    let mut grid = LayoutGrid::new();
    grid.set_column_count(4);
    grid.add_region(&DataPath::from("title"), 1);
    grid.add_region(&DataPath::from("orders/group"), 1);
    grid.add_region(&DataPath::from("orders/lines"), 3);
    grid.add_region(&DataPath::from("footer"), 1);
    grid.set_region_visible(1, false);
    grid.set_region_virtual(2, true);

    grid.set_cell_binding(0, 0, Some(TextBinding::new("Sales by order")));
    grid.set_cell_binding(1, 0, Some(TextBinding::new("=[OrderId]")));
    grid.set_cell_binding(2, 1, Some(TextBinding::new("=[Product] & \"<x>\"")));
    grid.set_cell_binding(3, 3, Some(TextBinding::new("=[Price]").with_format("#,##0.00")));
    grid.set_cell_binding(5, 3, Some(TextBinding::new("=Sum([Price])")));

    grid.set_row_height(0, Some(32));
    grid.set_row_height(4, Some(18));
    grid.set_row_base(2, Some(0));
    grid.set_row_base(3, Some(1));

    grid.set_span(0, 0, SpanSize::new(4, 1)).unwrap();
    grid.set_span(1, 0, SpanSize::new(1, 3)).unwrap();
    grid.set_span(5, 0, SpanSize::new(3, 1)).unwrap();
    grid
}

// ============================================================================
// Invariant checks
// ============================================================================

/// Region rows add up, the span matrix matches the grid and every anchor
/// lies inside it.
pub fn assert_layout_invariants(grid: &LayoutGrid<TextBinding>) {
    let summed: usize = grid.regions().iter().map(|r| r.row_count()).sum();
    assert_eq!(summed, grid.row_count(true), "region rows must add up");
    assert_eq!(grid.spans().rows(), grid.row_count(true), "span rows");
    assert_eq!(grid.spans().cols(), grid.column_count(), "span columns");

    for anchor in grid.spans().anchors() {
        assert!(anchor.size.width() >= 1 && anchor.size.height() >= 1);
        assert!(grid.spans().fits(&anchor), "anchor {anchor:?} outside matrix");
    }
    for region in grid.regions() {
        for (row, col, _) in region.bindings() {
            assert!(row < region.row_count());
            assert!(col < grid.column_count());
        }
    }
}
