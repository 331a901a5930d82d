//! Layout export.
//!
//! Serializes a layout to the XML template format read back by
//! [`crate::parser::parse_layout`].

pub(crate) mod layout_writer;

use crate::error::Result;
use crate::layout::LayoutGrid;
use crate::types::CellBinding;

/// Serialize a layout to XML.
///
/// # Errors
/// Fails if a cell binding cannot be encoded.
pub fn write_layout_xml<B: CellBinding>(layout: &LayoutGrid<B>) -> Result<String> {
    layout_writer::write_layout_xml(layout)
}
