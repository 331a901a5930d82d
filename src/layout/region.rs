//! A band of rows (header, detail, summary...) inside a layout.

use std::sync::Arc;

use serde::Serialize;

use crate::sizing::{self, Matrix};
use crate::types::{CellBinding, DataPath};

/// Identifies a region for as long as its layout lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RegionId(pub(crate) u64);

/// One band of rows.
///
/// The per-row arrays always have `row_count` entries and the binding grid
/// is `row_count × column_count` of the owning layout. Regions are created
/// and resized only through their layout.
#[derive(Debug)]
pub struct Region<B> {
    id: RegionId,
    path: DataPath,
    visible: bool,
    is_virtual: bool,
    /// `None` = auto height.
    row_heights: Vec<Option<u32>>,
    /// `None` = not mapped to a base row.
    row_base_map: Vec<Option<usize>>,
    bindings: Matrix<Arc<B>>,
}

impl<B: CellBinding> Region<B> {
    pub(crate) fn new(id: RegionId, path: DataPath, rows: usize, cols: usize) -> Self {
        Self {
            id,
            path,
            visible: true,
            is_virtual: false,
            row_heights: vec![None; rows],
            row_base_map: vec![None; rows],
            bindings: sizing::new_matrix(rows, cols),
        }
    }

    #[must_use]
    pub fn id(&self) -> RegionId {
        self.id
    }

    #[must_use]
    pub fn path(&self) -> &DataPath {
        &self.path
    }

    pub(crate) fn set_path(&mut self, path: DataPath) {
        self.path = path;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Placeholder regions are not hidden when their last row is removed.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub(crate) fn set_virtual(&mut self, is_virtual: bool) {
        self.is_virtual = is_virtual;
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_heights.len()
    }

    /// Row count as seen by a query that may skip hidden regions.
    #[must_use]
    pub fn row_count_if(&self, include_hidden: bool) -> usize {
        if include_hidden || self.visible {
            self.row_count()
        } else {
            0
        }
    }

    #[must_use]
    pub fn row_height(&self, row: usize) -> Option<u32> {
        self.row_heights.get(row).copied().flatten()
    }

    /// Set a row height; zero is stored as auto.
    pub(crate) fn set_row_height(&mut self, row: usize, height: Option<u32>) -> bool {
        match self.row_heights.get_mut(row) {
            Some(slot) => {
                *slot = height.filter(|h| *h > 0);
                true
            }
            None => false,
        }
    }

    /// The base row this row maps to, if any.
    #[must_use]
    pub fn row_base(&self, row: usize) -> Option<usize> {
        self.row_base_map.get(row).copied().flatten()
    }

    pub(crate) fn set_row_base(&mut self, row: usize, base: Option<usize>) -> bool {
        match self.row_base_map.get_mut(row) {
            Some(slot) => {
                *slot = base;
                true
            }
            None => false,
        }
    }

    /// The binding at (row, col). Columns past the stored width are absent.
    #[must_use]
    pub fn cell_binding(&self, row: usize, col: usize) -> Option<&Arc<B>> {
        self.bindings.get(row)?.get(col)?.as_ref()
    }

    pub(crate) fn set_cell_binding(&mut self, row: usize, col: usize, binding: Option<Arc<B>>) -> bool {
        match self.bindings.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(slot) => {
                *slot = binding;
                true
            }
            None => false,
        }
    }

    /// Every stored binding as `(row, col, binding)` in row-major order.
    pub fn bindings(&self) -> impl Iterator<Item = (usize, usize, &Arc<B>)> + '_ {
        self.bindings.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.as_ref().map(|b| (row, col, b)))
        })
    }

    /// Insert an empty row before `row` (0 ≤ row ≤ row_count).
    pub(crate) fn insert_row(&mut self, row: usize, cols: usize) -> bool {
        if row > self.row_count() {
            return false;
        }
        self.row_heights = sizing::insert_at(std::mem::take(&mut self.row_heights), row, None);
        self.row_base_map = sizing::insert_at(std::mem::take(&mut self.row_base_map), row, None);
        self.bindings = sizing::insert_row(std::mem::take(&mut self.bindings), row, cols);
        true
    }

    /// Delete `row` (0 ≤ row < row_count).
    pub(crate) fn remove_row(&mut self, row: usize) -> bool {
        if row >= self.row_count() {
            return false;
        }
        self.row_heights = sizing::remove_at(std::mem::take(&mut self.row_heights), row);
        self.row_base_map = sizing::remove_at(std::mem::take(&mut self.row_base_map), row);
        self.bindings = sizing::remove_row(std::mem::take(&mut self.bindings), row);
        true
    }

    pub(crate) fn insert_column(&mut self, col: usize) {
        self.bindings = sizing::insert_column(std::mem::take(&mut self.bindings), col);
    }

    pub(crate) fn remove_column(&mut self, col: usize) {
        self.bindings = sizing::remove_column(std::mem::take(&mut self.bindings), col);
    }

    /// Copy the region. Bindings are deep-copied where the payload allows
    /// it and shared otherwise.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        Self {
            id: self.id,
            path: self.path.clone(),
            visible: self.visible,
            is_virtual: self.is_virtual,
            row_heights: self.row_heights.clone(),
            row_base_map: self.row_base_map.clone(),
            bindings: sizing::deep_clone(&self.bindings, |binding| {
                binding
                    .deep_copy()
                    .map_or_else(|| Arc::clone(binding), Arc::new)
            }),
        }
    }
}
