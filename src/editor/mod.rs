//! Thread-safe editing surface around a [`LayoutGrid`].
//!
//! `SharedLayout` owns one coarse reader/writer lock per layout. Every
//! structural edit runs entirely under the write lock, so readers never
//! see region arrays and the span matrix out of step. `RegionHandle` is a
//! weak back-reference from a region to its layout.

mod region_handle;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{LayoutError, Result};
use crate::export::write_layout_xml;
use crate::layout::{LayoutGrid, RegionId, RowRemoval};
use crate::types::{CellBinding, SpanRect, SpanSize};

pub use region_handle::RegionHandle;

/// A layout shared between threads. Cloning shares the same layout.
pub struct SharedLayout<B: CellBinding> {
    inner: Arc<RwLock<LayoutGrid<B>>>,
}

impl<B: CellBinding> Clone for SharedLayout<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: CellBinding> std::fmt::Debug for SharedLayout<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedLayout")
            .field("poisoned", &self.inner.is_poisoned())
            .finish_non_exhaustive()
    }
}

impl<B: CellBinding> From<LayoutGrid<B>> for SharedLayout<B> {
    fn from(grid: LayoutGrid<B>) -> Self {
        Self::new(grid)
    }
}

impl<B: CellBinding> SharedLayout<B> {
    pub fn new(grid: LayoutGrid<B>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(grid)),
        }
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, LayoutGrid<B>>> {
        self.inner.read().map_err(|_| {
            tracing::warn!("layout lock poisoned");
            LayoutError::Poisoned
        })
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, LayoutGrid<B>>> {
        self.inner.write().map_err(|_| {
            tracing::warn!("layout lock poisoned");
            LayoutError::Poisoned
        })
    }

    /// Run a query under the shared read lock.
    ///
    /// # Errors
    /// Returns [`LayoutError::Poisoned`] if a writer panicked.
    pub fn read<R>(&self, f: impl FnOnce(&LayoutGrid<B>) -> R) -> Result<R> {
        let guard = self.read_guard()?;
        Ok(f(&guard))
    }

    /// Run an edit, or a sequence of edits, under the write lock.
    ///
    /// # Errors
    /// Returns [`LayoutError::Poisoned`] if a writer panicked.
    pub fn write<R>(&self, f: impl FnOnce(&mut LayoutGrid<B>) -> R) -> Result<R> {
        let mut guard = self.write_guard()?;
        Ok(f(&mut guard))
    }

    /// Independent deep copy. `None` (logged) if the lock is poisoned.
    #[must_use]
    pub fn try_clone(&self) -> Option<Self> {
        let guard = self.read_guard().ok()?;
        Some(Self::new(guard.deep_clone()))
    }

    /// Weak handle to region `index`.
    #[must_use]
    pub fn region(&self, index: usize) -> Option<RegionHandle<B>> {
        let id = self.read(|grid| grid.region(index).map(|r| r.id())).ok()??;
        Some(self.region_by_id(id))
    }

    /// Weak handle to a region by id. The handle is inert if the id is
    /// unknown.
    #[must_use]
    pub fn region_by_id(&self, id: RegionId) -> RegionHandle<B> {
        RegionHandle::new(Arc::downgrade(&self.inner), id)
    }

    /// Consume the wrapper.
    ///
    /// # Errors
    /// Returns a wrapper back while other clones still share the layout or
    /// when the lock is poisoned.
    pub fn into_inner(self) -> std::result::Result<LayoutGrid<B>, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => lock.into_inner().map_err(|poisoned| Self::new(poisoned.into_inner())),
            Err(inner) => Err(Self { inner }),
        }
    }

    // ========================================================================
    // LOCKED SHORTCUTS
    // ========================================================================

    #[must_use]
    pub fn row_count(&self, include_hidden: bool) -> usize {
        self.read(|grid| grid.row_count(include_hidden)).unwrap_or(0)
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.read(|grid| grid.column_count()).unwrap_or(0)
    }

    #[must_use]
    pub fn cell_binding(&self, row: usize, col: usize) -> Option<Arc<B>> {
        self.read(|grid| grid.cell_binding(row, col)).ok().flatten()
    }

    pub fn set_cell_binding(&self, row: usize, col: usize, binding: Option<B>) -> bool {
        self.write(|grid| grid.set_cell_binding(row, col, binding))
            .unwrap_or(false)
    }

    #[must_use]
    pub fn find_span(&self, row: usize, col: usize) -> Option<SpanRect> {
        self.read(|grid| grid.find_span(row, col)).ok().flatten()
    }

    /// # Errors
    /// See [`LayoutGrid::set_span`]; also fails on a poisoned lock.
    pub fn set_span(&self, row: usize, col: usize, size: Option<SpanSize>) -> Result<()> {
        self.write(|grid| grid.set_span(row, col, size))?
    }

    pub fn insert_row(&self, row: usize) -> bool {
        self.write(|grid| grid.insert_row(row)).unwrap_or(false)
    }

    pub fn remove_row(&self, row: usize, force: bool) -> RowRemoval {
        self.write(|grid| grid.remove_row(row, force))
            .unwrap_or(RowRemoval::Ignored)
    }

    pub fn insert_column(&self, col: usize) -> bool {
        self.write(|grid| grid.insert_column(col)).unwrap_or(false)
    }

    pub fn remove_column(&self, col: usize) -> bool {
        self.write(|grid| grid.remove_column(col)).unwrap_or(false)
    }

    /// Serialize under the read lock.
    ///
    /// # Errors
    /// Fails on a poisoned lock or an unencodable binding.
    pub fn to_xml(&self) -> Result<String> {
        self.read(|grid| write_layout_xml(grid))?
    }
}
