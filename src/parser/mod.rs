//! Layout template parser
//!
//! Reads the XML written by [`crate::export::write_layout_xml`] back into a
//! [`LayoutGrid`]. Regions are built as they are read, so the span block at
//! the end always sees the final row and column counts.

mod layout_reader;

use std::sync::Arc;

use crate::error::Result;
use crate::layout::{DefaultHooks, LayoutGrid, LayoutHooks};
use crate::types::CellBinding;

use layout_reader::LayoutReader;

/// Knobs for [`parse_layout_with`].
///
/// The defaults read a written layout back unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Drop regions that were stored with zero rows.
    pub prune_empty_regions: bool,
}

/// Parse a layout using the default hooks.
///
/// # Errors
/// Fails on malformed XML. Individual bad fields are logged and skipped.
pub fn parse_layout<B: CellBinding + Default>(xml: &str) -> Result<LayoutGrid<B>> {
    parse_layout_with(xml, Arc::new(DefaultHooks), ParseOptions::default())
}

/// Parse a layout driven by a layout kind's hooks.
///
/// # Errors
/// Fails on malformed XML. Individual bad fields are logged and skipped.
pub fn parse_layout_with<B: CellBinding>(
    xml: &str,
    hooks: Arc<dyn LayoutHooks<B>>,
    options: ParseOptions,
) -> Result<LayoutGrid<B>> {
    let mut grid = LayoutReader::new(LayoutGrid::with_hooks(hooks)).read(xml)?;
    if options.prune_empty_regions {
        grid.remove_empty_regions();
    }
    tracing::debug!(
        regions = grid.region_count(),
        rows = grid.row_count(true),
        columns = grid.column_count(),
        spans = grid.spans().anchor_count(),
        "parsed layout"
    );
    Ok(grid)
}
