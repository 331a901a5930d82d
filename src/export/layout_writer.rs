//! Generates layout XML from a `LayoutGrid`.
//!
//! Every row gets a `<rowHeight>` and a `<rowBinding>`; auto heights are
//! written as `0` and unmapped rows as `-1`. Only non-empty cells and span
//! anchors are written.

use crate::error::Result;
use crate::layout::{LayoutGrid, Region};
use crate::types::CellBinding;

/// Write a complete layout XML string.
pub(crate) fn write_layout_xml<B: CellBinding>(layout: &LayoutGrid<B>) -> Result<String> {
    let mut out = String::with_capacity(1024);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str(&format!(
        "<tableLayout columns=\"{}\">\n",
        layout.column_count()
    ));

    for region in layout.regions() {
        write_region(&mut out, region)?;
    }

    // <spans> is always present so readers can size the matrix up front
    out.push_str("<spans>\n");
    for anchor in layout.spans().anchors() {
        out.push_str(&format!(
            "<span r=\"{}\" c=\"{}\" w=\"{}\" h=\"{}\"/>\n",
            anchor.row,
            anchor.col,
            anchor.size.width(),
            anchor.size.height()
        ));
    }
    out.push_str("</spans>\n");
    out.push_str("</tableLayout>\n");
    Ok(out)
}

fn write_region<B: CellBinding>(out: &mut String, region: &Region<B>) -> Result<()> {
    out.push_str("<layoutRegion>\n");
    out.push_str(&format!(
        "<tableDataPath>{}</tableDataPath>\n",
        xml_escape(region.path().as_str())
    ));
    out.push_str(&format!(
        "<region rows=\"{}\" visible=\"{}\" virtual=\"{}\">\n",
        region.row_count(),
        region.is_visible(),
        region.is_virtual()
    ));

    for row in 0..region.row_count() {
        out.push_str(&format!(
            "<rowHeight row=\"{}\" height=\"{}\"/>\n",
            row,
            region.row_height(row).unwrap_or(0)
        ));
    }
    for row in 0..region.row_count() {
        let binding = region
            .row_base(row)
            .map_or_else(|| "-1".to_string(), |base| base.to_string());
        out.push_str(&format!(
            "<rowBinding row=\"{}\" binding=\"{}\"/>\n",
            row, binding
        ));
    }
    for (row, col, binding) in region.bindings() {
        out.push_str(&format!(
            "<cell row=\"{}\" column=\"{}\"><cellBinding>{}</cellBinding></cell>\n",
            row,
            col,
            xml_escape(&binding.encode()?)
        ));
    }

    out.push_str("</region>\n");
    out.push_str("</layoutRegion>\n");
    Ok(())
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
