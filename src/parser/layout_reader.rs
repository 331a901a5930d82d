//! Event-driven reader for layout XML.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::Result;
use crate::layout::LayoutGrid;
use crate::types::{CellBinding, DataPath, SpanSize};
use crate::xml_helpers::{attr_bool_default, attr_i64, attr_usize};

/// Largest total row count a template may declare.
const MAX_ROWS: usize = 1 << 20;
/// Largest column count a template may declare.
const MAX_COLUMNS: usize = 1 << 14;

/// Which element's text is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    Ignore,
    DataPath,
    CellBinding,
}

pub(super) struct LayoutReader<B: CellBinding> {
    grid: LayoutGrid<B>,
    /// Path read from the current `<layoutRegion>`.
    path: Option<String>,
    /// Index of the region the current `<layoutRegion>` created.
    region: Option<usize>,
    /// Local (row, column) of the open `<cell>`.
    cell: Option<(usize, usize)>,
    text: TextTarget,
}

impl<B: CellBinding> LayoutReader<B> {
    pub(super) fn new(grid: LayoutGrid<B>) -> Self {
        Self {
            grid,
            path: None,
            region: None,
            cell: None,
            text: TextTarget::Ignore,
        }
    }

    pub(super) fn read(mut self, xml: &str) -> Result<LayoutGrid<B>> {
        let mut reader = Reader::from_reader(xml.as_bytes());
        reader.trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(ref event @ (Event::Start(_) | Event::Empty(_))) => {
                    let (Event::Start(ref e) | Event::Empty(ref e)) = event else {
                        continue;
                    };
                    let is_start = matches!(event, Event::Start(_));
                    self.open_element(e, is_start);
                }
                Ok(Event::Text(ref t)) => {
                    let text = t.unescape()?;
                    self.take_text(&text);
                }
                Ok(Event::CData(t)) => {
                    let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                    self.take_text(&text);
                }
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"tableDataPath" | b"cellBinding" => self.text = TextTarget::Ignore,
                    b"cell" => self.cell = None,
                    b"layoutRegion" => {
                        if self.region.is_none() {
                            tracing::warn!(path = ?self.path, "layoutRegion without a region element");
                        }
                        self.region = None;
                        self.path = None;
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(e.into()),
                _ => {}
            }
            buf.clear();
        }

        Ok(self.grid)
    }

    fn open_element(&mut self, e: &BytesStart, is_start: bool) {
        match e.local_name().as_ref() {
            b"tableLayout" => {
                let columns = attr_usize(e, b"columns").unwrap_or(0);
                if columns > MAX_COLUMNS {
                    tracing::warn!(columns, max = MAX_COLUMNS, "skipping oversized column count");
                } else {
                    self.grid.set_column_count(columns);
                }
            }
            b"layoutRegion" => {
                self.path = None;
                self.region = None;
            }
            b"tableDataPath" => {
                self.path = Some(String::new());
                if is_start {
                    self.text = TextTarget::DataPath;
                }
            }
            b"region" => self.open_region(e),
            b"rowHeight" => self.read_row_height(e),
            b"rowBinding" => self.read_row_binding(e),
            b"cell" => {
                self.cell = match (attr_usize(e, b"row"), attr_usize(e, b"column")) {
                    (Some(row), Some(col)) if is_start => Some((row, col)),
                    _ => None,
                };
            }
            b"cellBinding" => {
                if is_start && self.cell.is_some() {
                    self.text = TextTarget::CellBinding;
                }
            }
            b"spans" => {
                tracing::debug!(
                    rows = self.grid.spans().rows(),
                    cols = self.grid.spans().cols(),
                    "reading spans"
                );
            }
            b"span" => self.read_span(e),
            _ => {}
        }
    }

    fn take_text(&mut self, text: &str) {
        match self.text {
            TextTarget::DataPath => self.path = Some(text.to_string()),
            TextTarget::CellBinding => self.read_cell_binding(text),
            TextTarget::Ignore => {}
        }
    }

    fn open_region(&mut self, e: &BytesStart) {
        let rows = attr_usize(e, b"rows").unwrap_or(0);
        let path = DataPath::new(self.path.take().unwrap_or_default());
        if rows > MAX_ROWS.saturating_sub(self.grid.row_count(true)) {
            tracing::warn!(region = %path, rows, max = MAX_ROWS, "skipping oversized region");
            return;
        }
        let id = self.grid.add_region(&path, rows);
        let Some(index) = self.grid.region_index(id) else {
            return;
        };
        self.grid
            .set_region_visible(index, attr_bool_default(e, b"visible", true));
        self.grid
            .set_region_virtual(index, attr_bool_default(e, b"virtual", false));
        self.region = Some(index);
    }

    /// Global row for a region-local row of the current region.
    fn global_row(&self, local: usize) -> Option<usize> {
        let global = self
            .region
            .and_then(|index| self.grid.convert_to_global_row(index, local));
        if global.is_none() {
            tracing::warn!(row = local, "skipping row outside its region");
        }
        global
    }

    fn read_row_height(&mut self, e: &BytesStart) {
        let (Some(local), Some(height)) = (attr_usize(e, b"row"), attr_i64(e, b"height")) else {
            return;
        };
        let Some(row) = self.global_row(local) else {
            return;
        };
        // Zero and negative heights mean auto
        let height = u32::try_from(height).ok().filter(|h| *h > 0);
        self.grid.set_row_height(row, height);
    }

    fn read_row_binding(&mut self, e: &BytesStart) {
        let (Some(local), Some(base)) = (attr_usize(e, b"row"), attr_i64(e, b"binding")) else {
            return;
        };
        let Some(row) = self.global_row(local) else {
            return;
        };
        self.grid.set_row_base(row, usize::try_from(base).ok());
    }

    fn read_cell_binding(&mut self, text: &str) {
        let Some((local, col)) = self.cell else {
            return;
        };
        let Some(row) = self.global_row(local) else {
            return;
        };
        match B::decode(text) {
            Ok(binding) => {
                if !self.grid.set_cell_binding(row, col, Some(binding)) {
                    tracing::warn!(row, col, "skipping cell outside the layout");
                }
            }
            Err(err) => tracing::warn!(row, col, error = %err, "skipping undecodable cell binding"),
        }
    }

    fn read_span(&mut self, e: &BytesStart) {
        let (Some(row), Some(col), Some(w), Some(h)) = (
            attr_usize(e, b"r"),
            attr_usize(e, b"c"),
            attr_usize(e, b"w"),
            attr_usize(e, b"h"),
        ) else {
            return;
        };
        let Some(size) = SpanSize::new(w, h) else {
            tracing::warn!(row, col, "skipping span with zero extent");
            return;
        };
        if let Err(err) = self.grid.set_span(row, col, Some(size)) {
            tracing::warn!(error = %err, "skipping span");
        }
    }
}
