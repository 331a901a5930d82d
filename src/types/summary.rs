use serde::Serialize;

use super::{CellBinding, DataPath};
use crate::layout::{LayoutGrid, RegionId};

/// JSON-friendly view of a layout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummary {
    pub column_count: usize,
    pub row_count: usize,
    /// Rows of visible regions only.
    pub visible_row_count: usize,
    pub regions: Vec<RegionSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<SpanEntry>,
}

/// One region in a [`LayoutSummary`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub id: RegionId,
    pub path: DataPath,
    /// Global row of the region's first row.
    pub start_row: usize,
    pub row_count: usize,
    pub visible: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_virtual: bool,
    pub bound_cells: usize,
}

/// A stored span anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpanEntry {
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
    /// The merge runs past the end of its anchor's region.
    #[serde(rename = "crossRegion", skip_serializing_if = "is_false")]
    pub cross_region: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl LayoutSummary {
    pub fn from_grid<B: CellBinding>(grid: &LayoutGrid<B>) -> Self {
        let mut start_row = 0;
        let regions = grid
            .regions()
            .iter()
            .map(|region| {
                let summary = RegionSummary {
                    id: region.id(),
                    path: region.path().clone(),
                    start_row,
                    row_count: region.row_count(),
                    visible: region.is_visible(),
                    is_virtual: region.is_virtual(),
                    bound_cells: region.bindings().count(),
                };
                start_row += region.row_count();
                summary
            })
            .collect();

        let spans = grid
            .spans()
            .anchors()
            .map(|anchor| SpanEntry {
                row: anchor.row,
                col: anchor.col,
                width: anchor.size.width(),
                height: anchor.size.height(),
                cross_region: grid.has_cross_region_span(anchor.row, anchor.col),
            })
            .collect();

        Self {
            column_count: grid.column_count(),
            row_count: grid.row_count(true),
            visible_row_count: grid.row_count(false),
            regions,
            spans,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{SpanSize, TextBinding};

    #[test]
    fn test_summary_of_two_regions() {
        let mut grid: LayoutGrid<TextBinding> = LayoutGrid::new();
        grid.set_column_count(3);
        grid.add_region(&DataPath::from("header"), 1);
        grid.add_region(&DataPath::from("detail"), 2);
        grid.set_region_visible(0, false);
        grid.set_cell_binding(1, 2, Some(TextBinding::new("=[Amount]")));
        grid.set_span(0, 0, SpanSize::new(1, 2)).unwrap();

        let summary = LayoutSummary::from_grid(&grid);
        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.visible_row_count, 2);
        assert_eq!(summary.regions.len(), 2);
        assert_eq!(summary.regions[1].start_row, 1);
        assert_eq!(summary.regions[1].bound_cells, 1);
        assert_eq!(
            summary.spans,
            vec![SpanEntry {
                row: 0,
                col: 0,
                width: 1,
                height: 2,
                cross_region: true,
            }]
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["columnCount"], 3);
        assert_eq!(json["regions"][0]["path"], "header");
        assert_eq!(json["spans"][0]["crossRegion"], true);
        assert!(json["regions"][0].get("isVirtual").is_none());
    }
}
