//! tablespan - spanning table-layout engine for report templates
//!
//! Models the grid behind a report table:
//! - Ordered regions (header, detail, footer...) stacked into global rows
//! - Opaque per-cell bindings owned by each region
//! - Merged cells stored as anchors in a sparse span matrix
//! - Row and column edits that keep regions and merges consistent
//! - An XML template format and a JSON summary
//!
//! # Usage
//!
//! ```
//! use tablespan::{DataPath, LayoutGrid, SpanSize, TextBinding};
//!
//! let mut grid: LayoutGrid<TextBinding> = LayoutGrid::new();
//! grid.set_column_count(3);
//! grid.add_region(&DataPath::from("header"), 1);
//! grid.add_region(&DataPath::from("detail"), 2);
//! grid.set_span(0, 0, SpanSize::new(3, 1)).unwrap();
//!
//! grid.insert_column(1);
//! assert_eq!(grid.span(0, 0), SpanSize::new(4, 1));
//! ```

pub mod editor;
pub mod error;
pub mod export;
pub mod layout;
pub mod parser;
pub mod sizing;
pub mod types;
pub mod xml_helpers;

pub use editor::{RegionHandle, SharedLayout};
pub use error::{LayoutError, Result};
pub use export::write_layout_xml;
pub use layout::{
    CompareMode, DefaultHooks, LayoutGrid, LayoutHooks, LayoutOptions, Region, RegionId,
    RowRemoval, SpanMatrix,
};
pub use parser::{parse_layout, parse_layout_with, ParseOptions};

pub use types::*;

/// Parse a layout template and return a JSON summary of it.
///
/// # Errors
/// Returns an error if the XML is malformed or the summary cannot be
/// serialized.
pub fn summarize_layout_xml(xml: &str) -> Result<String> {
    let grid: LayoutGrid<TextBinding> = parse_layout(xml)?;
    let summary = LayoutSummary::from_grid(&grid);
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
