use std::sync::{Arc, RwLock, Weak};

use crate::layout::{LayoutGrid, RegionId, RowRemoval};
use crate::types::{CellBinding, DataPath};

/// Weak back-reference from a region to the layout that owns it.
///
/// Region-local edits go through the owning layout so the span matrix
/// follows. Once the layout is dropped or the region removed, queries
/// return empty values and edits do nothing.
pub struct RegionHandle<B: CellBinding> {
    layout: Weak<RwLock<LayoutGrid<B>>>,
    id: RegionId,
}

impl<B: CellBinding> Clone for RegionHandle<B> {
    fn clone(&self) -> Self {
        Self {
            layout: Weak::clone(&self.layout),
            id: self.id,
        }
    }
}

impl<B: CellBinding> std::fmt::Debug for RegionHandle<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionHandle")
            .field("id", &self.id)
            .field("attached", &(self.layout.strong_count() > 0))
            .finish()
    }
}

impl<B: CellBinding> RegionHandle<B> {
    pub(super) fn new(layout: Weak<RwLock<LayoutGrid<B>>>, id: RegionId) -> Self {
        Self { layout, id }
    }

    #[must_use]
    pub fn id(&self) -> RegionId {
        self.id
    }

    fn with_layout<R>(&self, f: impl FnOnce(&LayoutGrid<B>, usize) -> R) -> Option<R> {
        let layout = self.layout.upgrade()?;
        let Ok(guard) = layout.read() else {
            tracing::warn!(region = ?self.id, "layout lock poisoned");
            return None;
        };
        let index = guard.region_index(self.id)?;
        Some(f(&guard, index))
    }

    fn with_layout_mut<R>(&self, f: impl FnOnce(&mut LayoutGrid<B>, usize) -> R) -> Option<R> {
        let layout = self.layout.upgrade()?;
        let Ok(mut guard) = layout.write() else {
            tracing::warn!(region = ?self.id, "layout lock poisoned");
            return None;
        };
        let index = guard.region_index(self.id)?;
        Some(f(&mut guard, index))
    }

    /// True while the layout is alive and still contains the region.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.with_layout(|_, _| ()).is_some()
    }

    /// Position of the region in its layout.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.with_layout(|_, index| index)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.with_layout(|grid, index| grid.region(index).map_or(0, |r| r.row_count()))
            .unwrap_or(0)
    }

    /// Column count of the owning layout.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.with_layout(|grid, _| grid.column_count()).unwrap_or(0)
    }

    #[must_use]
    pub fn path(&self) -> Option<DataPath> {
        self.with_layout(|grid, index| grid.region(index).map(|r| r.path().clone()))
            .flatten()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.with_layout(|grid, index| grid.region(index).is_some_and(|r| r.is_visible()))
            .unwrap_or(false)
    }

    /// Global row of a local row.
    #[must_use]
    pub fn global_row(&self, local: usize) -> Option<usize> {
        self.with_layout(|grid, index| grid.convert_to_global_row(index, local))
            .flatten()
    }

    #[must_use]
    pub fn cell_binding(&self, local: usize, col: usize) -> Option<Arc<B>> {
        self.with_layout(|grid, index| {
            grid.region(index)
                .and_then(|r| r.cell_binding(local, col))
                .map(Arc::clone)
        })
        .flatten()
    }

    pub fn set_cell_binding(&self, local: usize, col: usize, binding: Option<B>) -> bool {
        self.with_layout_mut(|grid, index| {
            grid.convert_to_global_row(index, local)
                .is_some_and(|row| grid.set_cell_binding(row, col, binding))
        })
        .unwrap_or(false)
    }

    pub fn set_visible(&self, visible: bool) -> bool {
        self.with_layout_mut(|grid, index| grid.set_region_visible(index, visible))
            .unwrap_or(false)
    }

    pub fn set_path(&self, path: &DataPath) -> bool {
        self.with_layout_mut(|grid, index| grid.set_region_path(index, path))
            .unwrap_or(false)
    }

    /// Insert an empty row before local row `local`.
    pub fn insert_row(&self, local: usize) -> bool {
        self.with_layout_mut(|grid, index| grid.insert_region_row(index, local))
            .unwrap_or(false)
    }

    /// Delete local row `local`. See [`LayoutGrid::remove_region_row`].
    pub fn remove_row(&self, local: usize, force: bool) -> RowRemoval {
        self.with_layout_mut(|grid, index| grid.remove_region_row(index, local, force))
            .unwrap_or(RowRemoval::Ignored)
    }

    pub fn set_row_count(&self, rows: usize) -> bool {
        self.with_layout_mut(|grid, index| grid.set_region_row_count(index, rows))
            .unwrap_or(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use crate::editor::SharedLayout;
    use crate::layout::{LayoutGrid, RowRemoval};
    use crate::types::{DataPath, TextBinding};

    fn shared() -> SharedLayout<TextBinding> {
        let mut grid = LayoutGrid::new();
        grid.set_column_count(2);
        grid.add_region(&DataPath::from("header"), 1);
        grid.add_region(&DataPath::from("detail"), 2);
        SharedLayout::new(grid)
    }

    #[test]
    fn test_handle_edits_go_through_layout() {
        let layout = shared();
        let detail = layout.region(1).unwrap();

        assert!(detail.insert_row(0));
        assert_eq!(detail.row_count(), 3);
        assert_eq!(layout.row_count(true), 4);

        assert!(detail.set_cell_binding(2, 1, Some(TextBinding::new("=[Total]"))));
        assert_eq!(layout.cell_binding(3, 1).unwrap().expression, "=[Total]");
        assert_eq!(detail.global_row(2), Some(3));
    }

    #[test]
    fn test_handle_follows_region_after_reorder() {
        let layout = shared();
        let detail = layout.region(1).unwrap();
        layout
            .write(|grid| grid.insert_region(0, &DataPath::from("title"), 1))
            .unwrap();
        assert_eq!(detail.index(), Some(2));
        assert_eq!(detail.path().unwrap().as_str(), "detail");
    }

    #[test]
    fn test_last_row_hides_unless_forced() {
        let layout = shared();
        let header = layout.region(0).unwrap();
        assert_eq!(header.remove_row(0, false), RowRemoval::Hidden);
        assert!(!header.is_visible());
        assert_eq!(header.row_count(), 1);

        assert_eq!(header.remove_row(0, true), RowRemoval::Removed);
        assert!(!header.is_attached());
        assert_eq!(header.row_count(), 0);
    }

    #[test]
    fn test_detached_handle_is_inert() {
        let layout = shared();
        let header = layout.region(0).unwrap();
        drop(layout);

        assert!(!header.is_attached());
        assert!(!header.insert_row(0));
        assert_eq!(header.remove_row(0, true), RowRemoval::Ignored);
        assert!(header.cell_binding(0, 0).is_none());
        assert_eq!(header.column_count(), 0);
    }
}
