//! Layout engine: regions stacked into one grid, merged-cell spans and the
//! structural edits that keep both consistent.
//!
//! This module handles:
//! - Global row ⇄ (region, local row) translation
//! - Span anchors and the merge covering any cell
//! - Row and column insertion/removal with span repair
//! - Deep clone and three-mode equality

mod compare;
mod grid;
mod hooks;
mod mutation;
mod region;
mod span_matrix;

pub use compare::CompareMode;
pub use grid::{LayoutGrid, LayoutOptions};
pub use hooks::{clip_and_dedupe, evict_overlapping, trim_path, DefaultHooks, LayoutHooks};
pub use mutation::RowRemoval;
pub use region::{Region, RegionId};
pub use span_matrix::SpanMatrix;
