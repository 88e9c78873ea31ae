//! Per-page shape storage
//!
//! Each page holds its shapes in commit order, which is also z-order and
//! undo order. Pages that never received a shape read as empty.

use crate::shape::Shape;
use std::collections::BTreeMap;

/// Ordered shape sequences keyed by 0-based page index
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    pages: BTreeMap<usize, Vec<Shape>>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed shape to a page
    ///
    /// No upper bound is checked here; the session validates page indexes
    /// against the open document.
    pub fn append(&mut self, page: usize, shape: Shape) {
        self.pages.entry(page).or_default().push(shape);
    }

    /// Shapes for a page in commit order; empty for unseen pages
    pub fn shapes_for(&self, page: usize) -> &[Shape] {
        self.pages.get(&page).map(Vec::as_slice).unwrap_or_default()
    }

    /// Remove and return the most recent shape on a page
    ///
    /// Returns `None` without mutating anything when the page is empty.
    pub fn undo_last(&mut self, page: usize) -> Option<Shape> {
        let shapes = self.pages.get_mut(&page)?;
        let shape = shapes.pop();
        if shapes.is_empty() {
            self.pages.remove(&page);
        }
        shape
    }

    /// Page indexes with at least one shape, ascending
    pub fn pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.pages.keys().copied()
    }

    /// Total number of shapes across all pages
    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }
}
