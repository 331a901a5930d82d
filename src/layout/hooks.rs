//! Collaborator hooks supplied by a concrete layout kind.
//!
//! A report table, a crosstab or a list each plug their own path rules,
//! binding factory and span policies into the same grid engine.

use crate::types::{CellBinding, DataPath, SpanAnchor, SpanSize};

use super::grid::LayoutGrid;
use super::span_matrix::SpanMatrix;

/// Extension points consumed by [`LayoutGrid`].
///
/// Hooks receive the whole layout and may edit span anchors, but must
/// leave the region row counts and the span matrix dimensions alone.
pub trait LayoutHooks<B: CellBinding>: Send + Sync {
    /// Normalize a region's data path before it is used as a key.
    /// Must be idempotent.
    fn fix_path_for_region(&self, path: &DataPath) -> DataPath {
        trim_path(path)
    }

    /// Create an empty payload for a cell.
    fn create_cell_binding(&self) -> B;

    /// Called by `set_span` before a new anchor is stored. Must not touch
    /// spans that do not overlap the target rectangle.
    fn reconcile_span(&self, layout: &mut LayoutGrid<B>, anchor: SpanAnchor) {
        evict_overlapping(layout.spans_mut(), anchor);
    }

    /// Called once after each structural edit on a non-degenerate matrix.
    fn validate(&self, layout: &mut LayoutGrid<B>) {
        clip_and_dedupe(layout.spans_mut());
    }
}

/// Hooks used when a layout kind has no special rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl<B: CellBinding + Default> LayoutHooks<B> for DefaultHooks {
    fn create_cell_binding(&self) -> B {
        B::default()
    }
}

/// Trim whitespace and surrounding separators from a path.
pub fn trim_path(path: &DataPath) -> DataPath {
    DataPath::new(path.as_str().trim().trim_matches('/').trim())
}

/// Remove every anchor that overlaps `anchor`, except one stored at the
/// same cell (it is about to be overwritten).
pub fn evict_overlapping(spans: &mut SpanMatrix, anchor: SpanAnchor) {
    let overlapping: Vec<SpanAnchor> = spans
        .anchors()
        .filter(|other| (other.row, other.col) != (anchor.row, anchor.col))
        .filter(|other| other.intersects(&anchor))
        .collect();
    for other in overlapping {
        tracing::debug!(
            row = other.row,
            col = other.col,
            "evicting span overlapped by new anchor"
        );
        spans.set_anchor(other.row, other.col, None);
    }
}

/// Best-effort cleanup after an edit: clip spans that run past the matrix
/// edge, then drop anchors that sit inside an earlier span.
pub fn clip_and_dedupe(spans: &mut SpanMatrix) {
    let (rows, cols) = (spans.rows(), spans.cols());
    let mut kept: Vec<SpanAnchor> = Vec::new();
    let anchors: Vec<SpanAnchor> = spans.anchors().collect();

    for anchor in anchors {
        let clipped = if spans.fits(&anchor) {
            Some(anchor.size)
        } else {
            SpanSize::new(
                anchor.size.width().min(cols.saturating_sub(anchor.col)),
                anchor.size.height().min(rows.saturating_sub(anchor.row)),
            )
        };
        let Some(size) = clipped else {
            spans.set_anchor(anchor.row, anchor.col, None);
            continue;
        };
        let candidate = SpanAnchor { size, ..anchor };
        if kept.iter().any(|k| k.intersects(&candidate)) {
            tracing::warn!(
                row = anchor.row,
                col = anchor.col,
                "dropping span nested in another merge"
            );
            spans.set_anchor(anchor.row, anchor.col, None);
            continue;
        }
        if size != anchor.size {
            tracing::debug!(row = anchor.row, col = anchor.col, "clipping span to matrix");
            spans.set_anchor(anchor.row, anchor.col, Some(size));
        }
        kept.push(candidate);
    }
}
