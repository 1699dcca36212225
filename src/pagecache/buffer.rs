//! The growth buffer: every row fetched so far, in server-page order.
//!
//! The buffer is published copy-on-write. Its contents live behind an
//! `Arc<Vec<I>>`; a renderer may keep a [`GrowthBuffer::snapshot`] while the
//! cache keeps working, and every mutation produces a fresh vector whenever a
//! snapshot is still alive. Deleting a row never shrinks the vector, it only
//! sets the row's tombstone, so page arithmetic stays valid.

use super::types::{Item, Row, SortDirection};
use crate::error::{Error, Result};
use crate::paginator::slice_bounds;
use std::sync::Arc;

/// Ordered, append-only-by-page row storage.
#[derive(Debug, Clone)]
pub struct GrowthBuffer<I> {
    items: Arc<Vec<I>>,
}

impl<I> Default for GrowthBuffer<I> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
        }
    }
}

impl<I: Item> GrowthBuffer<I> {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer holding `items`.
    pub fn from_items(items: Vec<I>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    /// Number of rows, tombstones included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer holds no rows at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All rows, tombstones included.
    pub fn items(&self) -> &[I] {
        &self.items
    }

    /// Row at absolute `index`.
    pub fn get(&self, index: usize) -> Option<&I> {
        self.items.get(index)
    }

    /// A shared handle to the current contents. Later mutations of the buffer
    /// do not show through it.
    pub fn snapshot(&self) -> Arc<Vec<I>> {
        Arc::clone(&self.items)
    }

    /// Appends one server page after everything fetched so far.
    pub fn append(&mut self, page: Vec<I>) {
        if page.is_empty() {
            return;
        }
        Arc::make_mut(&mut self.items).extend(page);
    }

    /// Replaces the whole contents.
    pub fn replace(&mut self, items: Vec<I>) {
        self.items = Arc::new(items);
    }

    /// Drops every row.
    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// The unfiltered slice for 1-based `page`.
    pub fn page_slice(&self, page: usize, per_page: usize) -> &[I] {
        let (start, end) = slice_bounds(page, per_page, self.items.len());
        &self.items[start..end]
    }

    /// Rows of `page` that are not tombstoned, each with its offset inside the
    /// unfiltered page slice.
    pub fn visible_rows(&self, page: usize, per_page: usize) -> Vec<Row<'_, I>> {
        self.page_slice(page, per_page)
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_deleted())
            .map(|(offset, item)| Row { offset, item })
            .collect()
    }

    /// Absolute buffer index of `offset` on 1-based `page`, or `None` when
    /// the position does not fit in a `usize`.
    pub fn absolute_index(page: usize, per_page: usize, offset: usize) -> Option<usize> {
        page.saturating_sub(1)
            .checked_mul(per_page)?
            .checked_add(offset)
    }

    /// Position of the row with `id`, if it is loaded.
    pub fn position_of(&self, id: &I::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == *id)
    }

    /// Rewrites the single row at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when `index` is past the end; the
    /// buffer is left untouched in that case.
    pub fn patch<F>(&mut self, index: usize, edit: F) -> Result<()>
    where
        F: FnOnce(&mut I),
    {
        let len = self.items.len();
        if index >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        edit(&mut Arc::make_mut(&mut self.items)[index]);
        Ok(())
    }

    /// Stable sort of the whole buffer on the string form of `field`.
    /// `Descending` is the exact reverse of the ascending order.
    pub fn sort(&mut self, field: I::Field, direction: SortDirection) {
        let mut sorted: Vec<I> = self.items.as_ref().clone();
        sorted.sort_by_cached_key(|item| item.sort_key(field));
        if direction == SortDirection::Descending {
            sorted.reverse();
        }
        self.replace(sorted);
    }
}
